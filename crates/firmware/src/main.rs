//! WaveGauge firmware — main entry point.
//!
//! Hardware-only entry point for the STM32F407. Brings up the CS42L51
//! codec over I²C, the I²S + circular DMA audio stream, and the
//! player/spectrum pipeline task.

#![no_std]
#![no_main]
#![allow(clippy::arithmetic_side_effects)] // register and pixel math, bounded by construction

use embassy_executor::Spawner;
use embassy_stm32::i2c::I2c;
use embassy_stm32::pac::interrupt;
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, i2c, pac, peripherals};
use embassy_time::Timer;
use embedded_graphics::framebuffer::{buffer_size, Framebuffer};
use embedded_graphics::pixelcolor::raw::{LittleEndian, RawU1};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use platform::{dma, AudioCodec, AudioConfig, DmaChannel, DmaTimeout, SampleSource};
use playback::{DmaEvent, Half, HalfFlags, Player, State};
use spectrum::{Channel, SpectrumAnalyzer};
use static_cell::StaticCell;

use firmware::audio::codec::Cs42l51Driver;
use firmware::config::{
    DFT_N, MAGNITUDE_BINS, RING_SAMPLES, SAMPLE_RATE_HZ, UNDERSAMPLING, WINDOW_SAMPLES,
};
use firmware::{SpectrogramView, SpectrumPipeline};

use defmt_rtt as _;
use panic_probe as _;

/// Magnitude rendered as a full-height bar. Chosen so typical program
/// material spans the view instead of flat-lining at the bottom.
const SPECTRUM_CEILING: u32 = 1 << 28;

/// Spectrogram view geometry (panel top strip).
const VIEW_WIDTH: u32 = 320;
const VIEW_HEIGHT: u32 = 200;

/// The half/transfer-complete handshake shared with the DMA interrupt.
static HALF_FLAGS: HalfFlags = HalfFlags::new();

/// The player owns the DMA ring; a `StaticCell` keeps the ring at a stable
/// address for the circular stream.
static PLAYER: StaticCell<Player<'static, DemoToneSource, RING_SAMPLES>> = StaticCell::new();

type Frame = Framebuffer<
    BinaryColor,
    RawU1,
    LittleEndian,
    { VIEW_WIDTH as usize },
    { VIEW_HEIGHT as usize },
    { buffer_size::<BinaryColor>(VIEW_WIDTH as usize, VIEW_HEIGHT as usize) },
>;
static FRAME: StaticCell<Frame> = StaticCell::new();

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Endless full-scale-fraction sawtooth, stereo interleaved. Stands in for
/// the storage path on boards without a card slot populated.
struct DemoToneSource {
    phase: i16,
}

impl DemoToneSource {
    const fn new() -> Self {
        Self { phase: 0 }
    }
}

impl SampleSource for DemoToneSource {
    type Error = core::convert::Infallible;

    fn read(&mut self, buffer: &mut [i16]) -> Result<usize, Self::Error> {
        for frame in buffer.chunks_exact_mut(2) {
            self.phase = self.phase.wrapping_add(182); // ~266 Hz at 48 kHz
            for sample in frame {
                *sample = self.phase / 4;
            }
        }
        Ok(buffer.len())
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("WaveGauge firmware v{=str}", env!("CARGO_PKG_VERSION"));
    let p = embassy_stm32::init(Default::default());

    // Codec control plane on I²C1 (PB6 SCL / PB9 SDA).
    let i2c = I2c::new(
        p.I2C1,
        p.PB6,
        p.PB9,
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH0,
        Hertz(100_000),
        Default::default(),
    );
    let mut codec = Cs42l51Driver::new(i2c);
    let config = AudioConfig {
        sample_rate: SAMPLE_RATE_HZ,
        channels: 2,
        bit_depth: 16,
    };
    if let Err(e) = codec.init(config).await {
        defmt::error!("codec init failed: {:?}", defmt::Debug2Format(&e));
        return;
    }
    defmt::info!("CS42L51 up, {=u32} Hz stereo", SAMPLE_RATE_HZ);

    let player = PLAYER.init(Player::new(&HALF_FLAGS));
    if player.init(DemoToneSource::new()).is_err() {
        defmt::error!("player double init");
        return;
    }

    // The ring address is fixed from here on; hand it to the DMA engine
    // before the stream starts.
    if let Err(DmaTimeout) = start_i2s_stream(player.buffer()).await {
        defmt::error!("DMA stream did not acknowledge, audio stays off");
        return;
    }

    let analyzer = SpectrumAnalyzer::<DFT_N>::new(UNDERSAMPLING, Channel::Left);
    let view = SpectrogramView::<MAGNITUDE_BINS>::new(Rectangle::new(
        Point::zero(),
        Size::new(VIEW_WIDTH, VIEW_HEIGHT),
    ));
    let pipeline = SpectrumPipeline::new(analyzer, view, SPECTRUM_CEILING);
    let frame = FRAME.init(Frame::new());

    if player.play().is_err() {
        defmt::error!("play from {:?} refused", defmt::Debug2Format(&player.state()));
        return;
    }
    if let Err(e) = codec.start().await {
        defmt::error!("codec start failed: {:?}", defmt::Debug2Format(&e));
        return;
    }

    defmt::info!("playing");
    spawner.must_spawn(audio_task(player, pipeline, frame));
}

/// Task-context half of the playback loop: refills drained halves, feeds
/// the spectrum tap, renders dirty frames.
#[embassy_executor::task]
async fn audio_task(
    player: &'static mut Player<'static, DemoToneSource, RING_SAMPLES>,
    mut pipeline: SpectrumPipeline<SpectrogramView<MAGNITUDE_BINS>, DFT_N, WINDOW_SAMPLES>,
    frame: &'static mut Frame,
) {
    loop {
        // Remember which halves the interrupt has drained; those are the
        // ones poll() will refill and the tap should see.
        let pending = [
            !HALF_FLAGS.is_valid(Half::Lower),
            !HALF_FLAGS.is_valid(Half::Upper),
        ];
        let Ok(state) = player.poll() else {
            defmt::error!("player polled before init");
            break;
        };

        if state == State::Playing {
            for (half, was_pending) in Half::ALL.into_iter().zip(pending) {
                if was_pending {
                    if let Err(e) = pipeline.feed(player.half(half)) {
                        defmt::warn!("spectrum update dropped: {:?}", defmt::Debug2Format(&e));
                        pipeline.flush();
                    }
                }
            }
        }

        if pipeline.sink().is_dirty() {
            // The panel blit itself is board-specific; the frame is ready
            // for whatever transport the display rev uses.
            let _ = pipeline.sink_mut().draw(frame);
        }

        if state == State::Stopped {
            defmt::info!("stream drained");
            break;
        }

        // One half-buffer is ~10 ms of audio; polling at a quarter of
        // that keeps refills comfortably ahead of the stream.
        Timer::after_millis(2).await;
    }
}

/// DMA1 stream 4 (SPI2_TX) as a [`DmaChannel`].
struct AudioDmaStream;

impl DmaChannel for AudioDmaStream {
    fn request_enable(&mut self) {
        pac::DMA1.st(4).cr().modify(|w| w.set_en(true));
    }

    fn request_disable(&mut self) {
        pac::DMA1.st(4).cr().modify(|w| w.set_en(false));
    }

    fn is_enabled(&self) -> bool {
        pac::DMA1.st(4).cr().read().en()
    }
}

/// Configure SPI2 as I²S master transmitter and DMA1 stream 4 in circular
/// double-half mode over the player ring, then enable both. Enable and
/// disable go through the bounded acknowledge polls and fail closed.
async fn start_i2s_stream(ring: &'static [i16; RING_SAMPLES]) -> Result<(), DmaTimeout> {
    let mut stream = AudioDmaStream;
    let dma = pac::DMA1.st(4);

    // Stream must be disabled while reprogramming.
    dma::disable(&mut stream).await?;

    dma.par()
        .write_value(pac::SPI2.dr().as_ptr() as u32);
    dma.m0ar().write_value(ring.as_ptr() as u32);
    dma.ndtr().write(|w| w.set_ndt(RING_SAMPLES as u16));
    dma.cr().write(|w| {
        w.set_chsel(0); // channel 0: SPI2_TX
        w.set_dir(pac::dma::vals::Dir::MEMORYTOPERIPHERAL);
        w.set_minc(true);
        w.set_psize(pac::dma::vals::Size::BITS16);
        w.set_msize(pac::dma::vals::Size::BITS16);
        w.set_circ(true);
        w.set_htie(true);
        w.set_tcie(true);
    });

    // Clear any stale event flags before enabling the interrupt.
    pac::DMA1.ifcr(1).write(|w| {
        w.set_htif(0, true);
        w.set_tcif(0, true);
    });

    // SPI2 in I²S Philips mode, 16-bit, master transmit, DMA on TX.
    pac::SPI2.i2scfgr().modify(|w| {
        w.set_i2smod(true);
        w.set_i2se(true);
    });
    pac::SPI2.cr2().modify(|w| w.set_txdmaen(true));

    dma::enable(&mut stream).await?;

    // SAFETY: the handler only touches atomic flags and its own stream's
    // interrupt-clear registers.
    unsafe {
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::DMA1_STREAM4);
    }
    Ok(())
}

/// The only interrupt-context code in the firmware: decode which half just
/// finished and clear its valid flag. No sample memory is touched here.
#[interrupt]
fn DMA1_STREAM4() {
    // Stream 4 lives in the high-register bank, flag slot 0.
    let isr = pac::DMA1.isr(1).read();
    let event = if isr.tcif(0) {
        DmaEvent::TransferComplete
    } else if isr.htif(0) {
        DmaEvent::HalfComplete
    } else {
        return;
    };
    pac::DMA1.ifcr(1).write(|w| {
        w.set_htif(0, true);
        w.set_tcif(0, true);
    });
    HALF_FLAGS.mark_drained(event);
}
