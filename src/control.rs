//! Remote control via Unix socket
//!
//! Accepts lines of key characters over a Unix socket and forwards them to
//! the viewer as if they had been typed into the window, e.g.
//! `echo '}}>>x' | nc -U /tmp/gfxx.sock`. Keys are applied on the main
//! thread between renders.

use crate::error::{Error, Result};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Controller that listens for keys on a Unix socket
pub struct Controller {
    receiver: Receiver<char>,
    path: PathBuf,
    _listener_thread: thread::JoinHandle<()>,
}

impl Controller {
    /// Bind the socket, replacing a stale one left by an earlier run
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let _ = std::fs::remove_file(&path);

        let listener = UnixListener::bind(&path).map_err(|source| Error::CantCreate {
            path: path.clone(),
            source,
        })?;

        // Non-blocking so the accept loop can notice the receiver going away
        listener
            .set_nonblocking(true)
            .map_err(|e| Error::io(&path, e))?;

        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::listener_loop(&listener, &sender);
        });

        log::info!("listening for keys on {}", path.display());
        Ok(Self {
            receiver,
            path,
            _listener_thread: handle,
        })
    }

    fn listener_loop(listener: &UnixListener, sender: &Sender<char>) {
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    let sender = sender.clone();
                    thread::spawn(move || {
                        Self::handle_client(stream, &sender);
                    });
                },
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(50));
                },
                Err(e) => {
                    log::warn!("control socket closed: {}", e);
                    break;
                },
            }
        }
    }

    fn handle_client(stream: UnixStream, sender: &Sender<char>) {
        // Blocking reads per client; only the listener polls
        if let Err(e) = stream.set_nonblocking(false) {
            log::warn!("control client dropped: {}", e);
            return;
        }
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(std::result::Result::ok) {
            for key in parse_keys(&line) {
                if sender.send(key).is_err() {
                    return;
                }
            }
        }
    }

    /// Get any pending keys (non-blocking)
    pub fn poll(&self) -> Vec<char> {
        self.receiver.try_iter().collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Every non-whitespace character of a line is one key
fn parse_keys(line: &str) -> impl Iterator<Item = char> + '_ {
    line.chars().filter(|c| !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Instant;

    #[test]
    fn test_parse_keys_skips_whitespace() {
        let keys: Vec<char> = parse_keys(" }} > x\t").collect();
        assert_eq!(keys, vec!['}', '}', '>', 'x']);
    }

    #[test]
    fn test_keys_arrive_in_order() {
        let path = std::env::temp_dir().join(format!("gfxx-control-{}.sock", std::process::id()));
        let controller = Controller::new(&path).unwrap();

        let mut client = UnixStream::connect(&path).unwrap();
        client.write_all(b"jj\nq\n").unwrap();
        drop(client);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut keys = Vec::new();
        while keys.len() < 3 && Instant::now() < deadline {
            keys.extend(controller.poll());
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(keys, vec!['j', 'j', 'q']);

        drop(controller);
        assert!(!path.exists());
    }
}
