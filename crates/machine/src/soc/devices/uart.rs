//! 16550-style UART serial port.
//!
//! Implements the register file and FIFO behavior of a 16550-compatible UART
//! and moves bytes through a pluggable [`ByteChannel`] backend. The device
//! never touches the host directly: the primary UART is bridged to the
//! terminal by [`crate::console::Console`], the secondary one is left on the
//! disconnected [`NullChannel`].

use std::collections::VecDeque;

use crate::common::{BusFault, ChannelError};
use crate::soc::traits::BusTarget;

/// Receiver Buffer Register (read) / Divisor Latch Low (DLAB=1).
const REG_RBR: u32 = 0;
/// Transmitter Holding Register (write) / Divisor Latch Low (DLAB=1).
const REG_THR: u32 = 0;
/// Interrupt Enable Register / Divisor Latch High (DLAB=1).
const REG_IER: u32 = 1;
/// Interrupt Identity Register (read).
const REG_IIR: u32 = 2;
/// FIFO Control Register (write).
const REG_FCR: u32 = 2;
/// Line Control Register.
const REG_LCR: u32 = 3;
/// Modem Control Register.
const REG_MCR: u32 = 4;
/// Line Status Register.
const REG_LSR: u32 = 5;
/// Modem Status Register.
const REG_MSR: u32 = 6;
/// Scratch Register.
const REG_SCR: u32 = 7;

/// Interrupt Identity Register: no interrupt pending.
const IIR_NO_INTERRUPT: u8 = 0x01;
/// Interrupt Identity Register: transmitter holding register empty.
const IIR_THRE: u8 = 0x02;
/// Interrupt Identity Register: receiver data available.
const IIR_RDA: u8 = 0x04;
/// Interrupt Identity Register: FIFO-enabled id bits (7:6).
const IIR_ID_MASK: u8 = 0xC0;

/// Line Status Register: receiver has data.
const LSR_DATA_READY: u8 = 0x01;
/// Line Status Register: transmitter holding register empty.
const LSR_THRE: u8 = 0x20;
/// Line Status Register: transmitter completely idle.
const LSR_TEMT: u8 = 0x40;

/// Line Control Register: divisor latch access bit.
const LCR_DLAB: u8 = 0x80;

/// Interrupt Enable Register: receiver data available.
const IER_RDA: u8 = 0x01;
/// Interrupt Enable Register: transmitter holding register empty.
const IER_THRE: u8 = 0x02;

/// RX/TX FIFO depth.
const FIFO_DEPTH: usize = 16;

/// One-byte transfer backend for a UART.
///
/// Invoked by the device whenever it needs to move one byte. Absence of
/// input is an immediate, ordinary outcome ([`ChannelError::Empty`]), never
/// a suspension.
pub trait ByteChannel {
    /// Pushes one transmitted byte to the backend.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] when the backend cannot take the byte; the
    /// device keeps it queued.
    fn transmit(&mut self, byte: u8) -> Result<(), ChannelError>;

    /// Pulls one received byte from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Empty`] when no byte is ready.
    fn receive(&mut self) -> Result<u8, ChannelError>;
}

/// Placeholder backend with nothing attached: every transfer fails,
/// including writes.
///
/// Any real byte-stream backend can replace it without touching the bus
/// router.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChannel;

impl ByteChannel for NullChannel {
    fn transmit(&mut self, _byte: u8) -> Result<(), ChannelError> {
        Err(ChannelError::Disconnected)
    }

    fn receive(&mut self) -> Result<u8, ChannelError> {
        Err(ChannelError::Disconnected)
    }
}

/// UART device state.
pub struct Uart {
    channel: Box<dyn ByteChannel>,
    rx_fifo: VecDeque<u8>,
    tx_fifo: VecDeque<u8>,
    ier: u8,
    lcr: u8,
    mcr: u8,
    scr: u8,
    div: u16,
    thre_ip: bool,
}

impl Uart {
    /// Creates a new UART moving bytes through the given channel.
    pub fn new(channel: Box<dyn ByteChannel>) -> Self {
        Self {
            channel,
            rx_fifo: VecDeque::with_capacity(FIFO_DEPTH),
            tx_fifo: VecDeque::with_capacity(FIFO_DEPTH),
            ier: 0,
            lcr: 0,
            mcr: 0,
            scr: 0,
            div: 0,
            thre_ip: false,
        }
    }

    /// Advances the device by one cycle.
    ///
    /// Moves at most one byte in each direction through the channel — a
    /// transmit failure leaves the byte queued, a receive only happens when
    /// the FIFO has room — then reports whether an enabled interrupt
    /// condition is pending.
    pub fn update(&mut self) -> bool {
        if let Some(&byte) = self.tx_fifo.front() {
            if self.channel.transmit(byte).is_ok() {
                let _ = self.tx_fifo.pop_front();
                if self.tx_fifo.is_empty() {
                    self.thre_ip = true;
                }
            }
        }

        if self.rx_fifo.len() < FIFO_DEPTH {
            if let Ok(byte) = self.channel.receive() {
                self.rx_fifo.push_back(byte);
            }
        }

        (self.interrupt_id() & IIR_NO_INTERRUPT) == 0
    }

    /// Returns the highest-priority pending interrupt id.
    fn interrupt_id(&self) -> u8 {
        if (self.ier & IER_RDA) != 0 && !self.rx_fifo.is_empty() {
            return IIR_RDA;
        }
        if (self.ier & IER_THRE) != 0 && self.thre_ip {
            return IIR_THRE;
        }
        IIR_NO_INTERRUPT
    }

    fn dlab_set(&self) -> bool {
        (self.lcr & LCR_DLAB) != 0
    }

    fn read_rbr_or_dll(&mut self) -> u8 {
        if self.dlab_set() {
            (self.div & 0xFF) as u8
        } else {
            self.rx_fifo.pop_front().unwrap_or(0)
        }
    }

    fn read_ier_or_dlm(&self) -> u8 {
        if self.dlab_set() {
            (self.div >> 8) as u8
        } else {
            self.ier
        }
    }

    /// Reading the IIR clears a pending THRE interrupt.
    fn read_iir(&mut self) -> u8 {
        let id = self.interrupt_id();
        if id == IIR_THRE {
            self.thre_ip = false;
        }
        IIR_ID_MASK | id
    }

    fn read_lsr(&self) -> u8 {
        let mut lsr = 0;
        if self.tx_fifo.is_empty() {
            lsr |= LSR_THRE | LSR_TEMT;
        }
        if !self.rx_fifo.is_empty() {
            lsr |= LSR_DATA_READY;
        }
        lsr
    }

    fn write_thr_or_dll(&mut self, val: u8) {
        if self.dlab_set() {
            self.div = (self.div & 0xFF00) | u16::from(val);
        } else if self.tx_fifo.len() < FIFO_DEPTH {
            self.tx_fifo.push_back(val);
        }
        // A write to a full FIFO is dropped.
    }

    fn write_ier_or_dlm(&mut self, val: u8) {
        if self.dlab_set() {
            self.div = (self.div & 0x00FF) | (u16::from(val) << 8);
        } else {
            self.ier = val;
            if (self.ier & IER_THRE) != 0 && self.tx_fifo.is_empty() {
                self.thre_ip = true;
            }
        }
    }

    fn read_reg(&mut self, offset: u32) -> u8 {
        match offset {
            REG_RBR => self.read_rbr_or_dll(),
            REG_IER => self.read_ier_or_dlm(),
            REG_IIR => self.read_iir(),
            REG_LCR => self.lcr,
            REG_MCR => self.mcr,
            REG_LSR => self.read_lsr(),
            REG_MSR => 0,
            REG_SCR => self.scr,
            _ => 0,
        }
    }

    fn write_reg(&mut self, offset: u32, val: u8) {
        match offset {
            REG_THR => self.write_thr_or_dll(val),
            REG_IER => self.write_ier_or_dlm(val),
            REG_FCR => {}
            REG_LCR => self.lcr = val,
            REG_MCR => self.mcr = val,
            REG_SCR => self.scr = val,
            _ => {}
        }
    }
}

impl BusTarget for Uart {
    /// Reads the addressed register; wider accesses still act on that single
    /// byte register.
    fn load(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), BusFault> {
        if buf.is_empty() || buf.len() > 8 {
            return Err(BusFault);
        }
        buf.fill(0);
        buf[0] = self.read_reg(offset);
        Ok(())
    }

    /// Writes the addressed register from the low byte of the access.
    fn store(&mut self, offset: u32, buf: &[u8]) -> Result<(), BusFault> {
        if buf.is_empty() || buf.len() > 8 {
            return Err(BusFault);
        }
        self.write_reg(offset, buf[0]);
        Ok(())
    }
}

impl std::fmt::Debug for Uart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uart")
            .field("rx_fifo", &self.rx_fifo)
            .field("tx_fifo", &self.tx_fifo)
            .field("ier", &self.ier)
            .field("lcr", &self.lcr)
            .field("thre_ip", &self.thre_ip)
            .finish_non_exhaustive()
    }
}
