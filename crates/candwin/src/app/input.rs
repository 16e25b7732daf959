use std::io::BufRead;
use std::thread;

use crossbeam_channel::Receiver;
use tracing::debug;
use tracing::warn;

use crate::infra::BridgeError;

const LINE_CAPACITY: usize = 64;

/// Reads script lines on a dedicated thread so the event loop never blocks
/// on input. The channel disconnects at end of input.
pub fn spawn_line_reader<R>(input: R) -> Result<Receiver<String>, BridgeError>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(LINE_CAPACITY);
    thread::Builder::new()
        .name("script-reader".to_string())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to read script input");
                        break;
                    }
                }
            }
            debug!("Script input finished");
        })
        .map_err(|e| BridgeError::InputReader(e.to_string()))?;

    Ok(rx)
}
