//! Redundant transmission of command frames.

use std::thread;

use expertctl_codec::CommandFrame;
use expertctl_transport::CommandSink;
use tracing::debug;

use crate::config::RepeatPolicy;
use crate::error::Result;

/// Per-session 8-bit sequence counter, wrapping at 256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceCounter(u8);

impl SequenceCounter {
    pub fn new(start: u8) -> Self {
        Self(start)
    }

    /// Value the next transmission will carry.
    pub fn peek(&self) -> u8 {
        self.0
    }

    /// Take the current value and move past it.
    pub fn advance(&mut self) -> u8 {
        let current = self.0;
        self.0 = self.0.wrapping_add(1);
        current
    }
}

impl RepeatPolicy {
    /// Send `frame` `count` times, restamping sequence and checksum before each send.
    ///
    /// Returns the number of datagrams sent. A send error aborts the burst.
    pub fn transmit<S: CommandSink>(
        &self,
        frame: &mut CommandFrame,
        sequence: &mut SequenceCounter,
        sink: &mut S,
    ) -> Result<usize> {
        for attempt in 0..self.count {
            if attempt > 0 && !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
            frame.stamp(sequence.advance());
            debug!(attempt, ?frame, "sending command datagram");
            sink.send_datagram(frame.as_bytes())?;
        }
        Ok(self.count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use expertctl_codec::{crc16, Command};
    use expertctl_transport::TransportError;

    use super::*;

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) sent: Vec<Vec<u8>>,
        pub(crate) fail_after: Option<usize>,
    }

    impl CommandSink for RecordingSink {
        fn send_datagram(&mut self, datagram: &[u8]) -> expertctl_transport::Result<()> {
            if self.fail_after.is_some_and(|limit| self.sent.len() >= limit) {
                return Err(TransportError::ShortSend {
                    sent: 0,
                    expected: datagram.len(),
                });
            }
            self.sent.push(datagram.to_vec());
            Ok(())
        }
    }

    #[test]
    fn default_burst_is_four_distinct_stamped_frames() {
        let mut frame = Command::Mute(true).encode().unwrap();
        let mut sequence = SequenceCounter::default();
        let mut sink = RecordingSink::default();

        let sent = RepeatPolicy::default()
            .transmit(&mut frame, &mut sequence, &mut sink)
            .unwrap();

        assert_eq!(sent, 4);
        assert_eq!(sink.sent.len(), 4);
        for (index, datagram) in sink.sent.iter().enumerate() {
            let seq = index as u8;
            assert_eq!(datagram[3], seq);
            assert_eq!(datagram[5], seq >> 1);
            let crc = u16::from_be_bytes([datagram[12], datagram[13]]);
            assert_eq!(crc, crc16(&datagram[..12]));
        }
        assert_eq!(sequence.peek(), 4);
    }

    #[test]
    fn custom_count() {
        let policy = RepeatPolicy {
            count: 2,
            interval: Duration::from_millis(1),
        };
        let mut frame = Command::Power(true).encode().unwrap();
        let mut sequence = SequenceCounter::new(10);
        let mut sink = RecordingSink::default();

        policy.transmit(&mut frame, &mut sequence, &mut sink).unwrap();

        assert_eq!(sink.sent.len(), 2);
        assert_eq!(sink.sent[1][3], 11);
        assert_eq!(sequence.peek(), 12);
    }

    #[test]
    fn sequence_wraps() {
        let mut sequence = SequenceCounter::new(255);
        assert_eq!(sequence.advance(), 255);
        assert_eq!(sequence.advance(), 0);
    }

    #[test]
    fn send_failure_stops_burst() {
        let mut frame = Command::Power(false).encode().unwrap();
        let mut sequence = SequenceCounter::default();
        let mut sink = RecordingSink {
            fail_after: Some(1),
            ..RecordingSink::default()
        };

        let result = RepeatPolicy::default().transmit(&mut frame, &mut sequence, &mut sink);

        assert!(result.is_err());
        assert_eq!(sink.sent.len(), 1);
    }
}
