use super::command::Command;
use super::timer::TimerEntry;

use std::collections::BinaryHeap;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SendError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Cloneable sender side of the reactor command channel.
#[derive(Clone)]
pub(crate) struct ReactorHandle {
    sender: Sender<Command>,
}

impl ReactorHandle {
    /// Sends a command to the reactor thread.
    ///
    /// Fails only once the reactor has exited.
    pub(crate) fn send(&self, command: Command) -> Result<(), SendError<Command>> {
        self.sender.send(command)
    }
}

/// The reactor event loop.
///
/// Owns all pending timers and sleeps until either the earliest deadline
/// is reached or a new command arrives.
pub(crate) struct Reactor {
    receiver: Receiver<Command>,
    timers: BinaryHeap<TimerEntry>,
}

impl Reactor {
    /// Starts the reactor on a dedicated thread.
    ///
    /// Returns the handle used to submit commands and the join handle of
    /// the reactor thread.
    pub(crate) fn start(name: &str) -> io::Result<(ReactorHandle, JoinHandle<()>)> {
        let (sender, receiver) = mpsc::channel();

        let mut reactor = Reactor {
            receiver,
            timers: BinaryHeap::new(),
        };

        let thread = thread::Builder::new()
            .name(format!("{name}-reactor"))
            .spawn(move || reactor.run())?;

        Ok((ReactorHandle { sender }, thread))
    }

    fn run(&mut self) {
        log::trace!("reactor started");

        loop {
            let command = match self.timers.peek() {
                Some(next) => {
                    let wait = next.deadline.saturating_duration_since(Instant::now());

                    match self.receiver.recv_timeout(wait) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.receiver.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(Command::SetTimer {
                    deadline,
                    waker,
                    cancelled,
                }) => self.timers.push(TimerEntry {
                    deadline,
                    waker,
                    cancelled,
                }),
                Some(Command::Shutdown) => break,
                None => {}
            }

            self.fire_expired();
        }

        log::trace!("reactor stopped with {} pending timers", self.timers.len());
    }

    fn fire_expired(&mut self) {
        let now = Instant::now();

        while self.timers.peek().is_some_and(|t| t.deadline <= now) {
            if let Some(timer) = self.timers.pop() {
                timer.fire();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::task::{Wake, Waker};
    use std::time::Duration;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn timer_fires_after_deadline() {
        let (handle, thread) = Reactor::start("test").unwrap();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));

        handle
            .send(Command::SetTimer {
                deadline: Instant::now() + Duration::from_millis(20),
                waker: Waker::from(counter.clone()),
                cancelled: Arc::new(AtomicBool::new(false)),
            })
            .unwrap();

        thread::sleep(Duration::from_millis(100));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        handle.send(Command::Shutdown).unwrap();
        thread.join().unwrap();
    }

    #[test]
    fn cancelled_timer_does_not_wake() {
        let (handle, thread) = Reactor::start("test").unwrap();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let cancelled = Arc::new(AtomicBool::new(false));

        handle
            .send(Command::SetTimer {
                deadline: Instant::now() + Duration::from_millis(30),
                waker: Waker::from(counter.clone()),
                cancelled: cancelled.clone(),
            })
            .unwrap();

        cancelled.store(true, Ordering::Release);

        thread::sleep(Duration::from_millis(100));
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        handle.send(Command::Shutdown).unwrap();
        thread.join().unwrap();
    }
}
