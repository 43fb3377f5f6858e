use anyhow::Result;
use log::info;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::Collection;

#[derive(Serialize)]
struct Document<'a> {
    data: &'a [Collection],
}

/// Serializes collections into the JSON interchange format.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn to_writer<W: Write>(&self, writer: W, collections: &[Collection]) -> Result<()> {
        let document = Document { data: collections };
        if self.pretty {
            serde_json::to_writer_pretty(writer, &document)?;
        } else {
            serde_json::to_writer(writer, &document)?;
        }
        Ok(())
    }

    pub fn convert(&self, output_path: &Path, collections: &[Collection]) -> Result<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(output_path)?);
        self.to_writer(&mut writer, collections)?;
        writer.flush()?;

        info!(
            "Wrote {} collection(s) to {}",
            collections.len(),
            output_path.display()
        );
        Ok(())
    }
}
