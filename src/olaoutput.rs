use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::str::FromStr;

use rosc::{encoder, OscMessage, OscPacket, OscType};

const UNIVERSE_SIZE: usize = 512;

/// One DMX universe, shipped to an OLA daemon as an OSC blob over UDP.
/// Channel values accumulate via the setters and go out with `flush`, which
/// also blacks the buffer out again for the next cycle.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    buffer: Vec<u8>,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr) -> Result<OlaOutput, io::Error> {
        let our_addr = SocketAddr::from_str("127.0.0.1:0").unwrap();
        let sock = UdpSocket::bind(our_addr)?;

        Ok(OlaOutput {
            sock,
            target_addr,
            buffer: vec![0; UNIVERSE_SIZE],
        })
    }

    pub fn set(&mut self, channel: u16, value: u8) {
        // Writes past the universe end are dropped
        if let Some(slot) = self.buffer.get_mut(channel as usize) {
            *slot = value;
        }
    }

    pub fn set_rgb(&mut self, start_channel: u16, values: [u8; 3]) {
        for i in 0..3 {
            self.set(start_channel.saturating_add(i), values[i as usize]);
        }
    }

    /// Lays out a whole strip's colors, three channels per LED starting at
    /// `start_channel`.
    pub fn write_strip(&mut self, start_channel: u16, colors: &[palette::Srgb]) {
        for (i, color) in colors.iter().enumerate() {
            let (r, g, b) = color.into_format::<u8>().into_components();
            self.set_rgb(start_channel.saturating_add(3 * i as u16), [r, g, b]);
        }
    }

    pub fn flush(&mut self) {
        let msg_buf = encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/dmx/universe/0".to_string(),
            args: vec![OscType::Blob(Vec::clone(&self.buffer))],
        }))
        .unwrap();

        if let Err(err) = self.sock.send_to(&msg_buf, self.target_addr) {
            log::warn!("Failed to send DMX universe to {}: {}", self.target_addr, err);
        }
        self.blackout();
    }

    pub fn blackout(&mut self) {
        for slot in &mut self.buffer {
            *slot = 0;
        }
    }
}
