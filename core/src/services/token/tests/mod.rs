
use std::collections::VecDeque;
use std::sync::Mutex;

use super::EntropySource;

/// Entropy source that fills each request with the next scripted byte
pub(super) struct ScriptedEntropy {
    fills: Mutex<VecDeque<u8>>,
}

impl ScriptedEntropy {
    pub(super) fn new(fills: impl IntoIterator<Item = u8>) -> Self {
        Self {
            fills: Mutex::new(fills.into_iter().collect()),
        }
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        let byte = self.fills.lock().unwrap().pop_front().ok_or_else(|| {
            rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "script exhausted",
            ))
        })?;
        dest.fill(byte);
        Ok(())
    }
}

/// Entropy source that always fails
pub(super) struct BrokenEntropy;

impl EntropySource for BrokenEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "getrandom unavailable",
        )))
    }
}
