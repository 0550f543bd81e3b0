use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use crate::render::OutputStream;
use crate::render::error::RenderError;

/// Writes a rendered page into a file.
pub struct OutputFile {
    writer: BufWriter<File>,
}

impl OutputFile {
    pub fn create(path: &Path) -> Result<OutputFile, RenderError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        Ok(Self { writer })
    }

    pub fn finish(mut self) -> Result<(), RenderError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl OutputStream for OutputFile {
    fn write(&mut self, data: &str) -> Result<(), RenderError> {
        self.writer.write_all(data.as_bytes())?;
        Ok(())
    }
}
