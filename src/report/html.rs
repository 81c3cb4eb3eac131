use log::*;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

use crate::{Result, report::BugRow};

/// Name the report template is looked up by.
pub const TEMPLATE_NAME: &str = "bugs.html";

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/bugs.html");

#[derive(Serialize)]
struct HtmlReport<'a> {
    bugs: &'a [BugRow],
    num_bugs: usize,
}

/// Load templates from `template_dir` when it provides [`TEMPLATE_NAME`],
/// otherwise use the built-in template.
fn load_templates(template_dir: Option<&str>) -> Result<tera::Tera> {
    if let Some(dir) = template_dir
        && Path::new(dir).join(TEMPLATE_NAME).exists()
    {
        debug!("loading templates from: {dir}");
        let tera = tera::Tera::new(&format!("{dir}/**/*.html"))?;
        return Ok(tera);
    }

    if let Some(dir) = template_dir {
        warn!("{TEMPLATE_NAME} not found in {dir}, using built-in template");
    }

    let mut tera = tera::Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
    Ok(tera)
}

pub fn render(rows: &[BugRow], template_dir: Option<&str>) -> Result<String> {
    let tera = load_templates(template_dir)?;
    let context = tera::Context::from_serialize(HtmlReport {
        bugs: rows,
        num_bugs: rows.len(),
    })?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// Render rows and write the document to `out_file`, creating parent
/// directories as needed.
pub async fn write(
    rows: &[BugRow],
    template_dir: Option<&str>,
    out_file: &str,
) -> Result<()> {
    let content = render(rows, template_dir)?;
    let file_path = Path::new(out_file);

    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).await?;
    }

    info!("writing html report to: {}", file_path.display());
    fs::write(file_path, &content).await?;

    Ok(())
}
