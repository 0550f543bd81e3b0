//! The HTML rendering boundary: Plotly figures inside a page shell.

mod plotly;

pub mod error;
pub mod output;
pub mod page;

use crate::render::error::RenderError;

pub trait OutputStream {
    fn write(&mut self, data: &str) -> Result<(), RenderError>;
}

pub trait Render {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream;
}

impl OutputStream for String {
    fn write(&mut self, data: &str) -> Result<(), RenderError> {
        self.push_str(data);
        Ok(())
    }
}
