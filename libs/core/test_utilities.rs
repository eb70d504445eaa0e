use std::{
    io::Write,
    sync::{Arc, Mutex},
};

/// In-memory writer for asserting on formatted log lines
#[derive(Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedOutput {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

pub fn memory_connection() -> edutask_document_db::Connection {
    let config = edutask_document_db::ConnectionConfig::builder()
        .connection_string("memory://edutask_test")
        .build();
    edutask_document_db::Connection::initialize(config).unwrap()
}
