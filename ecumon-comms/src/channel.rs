//! Interrupt-safe byte FIFO.
//!
//! One [`ByteChannel`] bridges one direction of a serial port: either a
//! receive interrupt producing for a consumer task, or a producer task
//! feeding a transmit interrupt. Single producer, single consumer, at most
//! one waiter on the wake signal.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::Deque;

struct Inner<const N: usize> {
    queue: Deque<u8, N>,
    dropped: u32,
}

/// Fixed-capacity FIFO byte queue with a wake signal.
///
/// The queue state lives behind a critical-section mutex, so every
/// mutation is safe against concurrent interrupt-context access; the
/// cursors are never exposed. The wake signal's meaning depends on the
/// direction the channel serves: "data available" for an inbound channel,
/// "space available" for an outbound one (see
/// [`SerialPort`](crate::SerialPort)).
pub struct ByteChannel<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<N>>>,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl<const N: usize> Default for ByteChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteChannel<N> {
    /// Create an empty channel. Static-friendly; channels live for the
    /// process lifetime.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                queue: Deque::new(),
                dropped: 0,
            })),
            wake: Signal::new(),
        }
    }

    /// Insert one byte, interrupt-context safe. Never blocks.
    ///
    /// On success the wake signal is raised for a blocked consumer. On a
    /// full queue the incoming byte is discarded and the loss counted:
    /// dropping the newest byte keeps the consumer's framing intact,
    /// where dropping the oldest would silently rewind it mid-packet.
    pub fn push(&self, byte: u8) -> bool {
        let pushed = self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            if inner.queue.push_back(byte).is_ok() {
                true
            } else {
                inner.dropped = inner.dropped.wrapping_add(1);
                false
            }
        });

        if pushed {
            self.wake.signal(());
        }
        pushed
    }

    /// Remove one byte without waiting, interrupt-context safe
    pub fn try_pop(&self) -> Option<u8> {
        self.inner.lock(|cell| cell.borrow_mut().queue.pop_front())
    }

    /// Remove one byte, suspending the calling task while the queue is
    /// empty. The single blocking point of the channel; task context only.
    pub async fn pop(&self) -> u8 {
        loop {
            if let Some(byte) = self.try_pop() {
                return byte;
            }
            self.wake.wait().await;
        }
    }

    /// Copy up to `buf.len()` queued bytes out without waiting.
    /// Returns the number copied; 0 when empty.
    ///
    /// The lock is taken once per byte, never across the whole copy, so
    /// the interrupt-masked window stays O(1) regardless of how large the
    /// caller's buffer is.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.try_pop() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Insert as many of `data` as fit without waiting. Returns the number
    /// accepted. Task-context producer side; what to do with the remainder
    /// (wait, drop) is the caller's policy, so no loss is counted here.
    ///
    /// Like [`ByteChannel::read`], one critical section per byte.
    pub fn write(&self, data: &[u8]) -> usize {
        let mut n = 0;
        while n < data.len() {
            let accepted = self
                .inner
                .lock(|cell| cell.borrow_mut().queue.push_back(data[n]).is_ok());
            if !accepted {
                break;
            }
            n += 1;
        }
        n
    }

    /// Number of queued bytes
    pub fn len(&self) -> usize {
        self.inner.lock(|cell| cell.borrow().queue.len())
    }

    /// True when no bytes are queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes that can be inserted without loss
    pub fn free_space(&self) -> usize {
        N - self.len()
    }

    /// Total capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes discarded by `push` against a full queue
    pub fn dropped(&self) -> u32 {
        self.inner.lock(|cell| cell.borrow().dropped)
    }

    /// Raise the wake signal without touching the queue
    pub fn wake(&self) {
        self.wake.signal(());
    }

    /// Suspend until the wake signal is raised, consuming it
    pub async fn wait(&self) {
        self.wake.wait().await;
    }
}
