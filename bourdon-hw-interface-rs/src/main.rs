//! bourdon-hw-interface
//!
//! Firmware for the bourdon drone synthesizer on the Raspberry Pi Pico 2.
//! Wires the three library crates into the live instrument:
//!
//! 1. Two PIO quadrature decoders accumulate the encoder positions.
//! 2. Two GPIO tasks turn button edges into key events.
//! 3. The control task runs the fixed-period cycle: sample inputs, map
//!    pitch, update the voice bank, publish a snapshot to the audio path,
//!    render the visual strategy, and present one LCD frame.
//! 4. The audio task, on its own higher-priority executor, renders the
//!    drone into double-buffered DMA for the PIO I2S output.
//!
//! The control task never touches the audio hardware and the audio task
//! never blocks on anything but its own DMA: the two meet only at a
//! bounded snapshot channel.

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::sync::atomic::{AtomicI32, Ordering};

use defmt::*;
use display_interface_spi::SPIInterface;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{PIO0, PIO1, SPI1};
use embassy_rp::pio::{self, Pio};
use embassy_rp::pio_programs::i2s::{PioI2sOut, PioI2sOutProgram};
use embassy_rp::pio_programs::rotary_encoder::{Direction, PioEncoder, PioEncoderProgram};
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::blocking_mutex::NoopMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Delay, Duration, Ticker, Timer};
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use bourdon::controls::{DroneControl, InputFrame, KeyEdge, BEND_KEY, MUTE_KEY};
use bourdon::scene::Scene;
use bourdon::visual::VisualStyle;
use bourdon::voices::VoiceBank;
use bourdon_lcd_display_rs::{compose, FrameBuffer, LcdDriver, FRAME_PIXELS};
use bourdon_synth::{delay_samples, DroneSynth, Echo, EchoConfig, OutputChain};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// PIO0 runs the encoder decoders, PIO1 the I2S output.
bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => pio::InterruptHandler<PIO0>;
    PIO1_IRQ_0 => pio::InterruptHandler<PIO1>;
});

// ---------------------------------------------------------------------------
// Fixed configuration
// ---------------------------------------------------------------------------

/// Which of the three visualizations this build runs. Also decides the
/// voice count (three for the scrolling traces, two otherwise) and the
/// frame period.
const VISUAL_STYLE: VisualStyle = VisualStyle::ScrollingTraces;

const SAMPLE_RATE: u32 = 44_100;
const BIT_DEPTH: u32 = 16;
const CHANNELS: u32 = 2;

/// Stereo frames per DMA half-buffer (~23 ms at 44.1 kHz).
const AUDIO_FRAMES: usize = 1_024;

const DISPLAY_SPI_HZ: u32 = 32_000_000;

/// Settle time after a button edge before the level is trusted.
const KEY_SETTLE_MS: u64 = 5;

/// Echo capability: when `true` the delay line below is handed to the
/// output chain at startup; when `false` the synth feeds the output
/// directly. The storage is reserved either way.
const ECHO_ENABLED: bool = true;
const ECHO_DELAY_MS: u32 = 600;
const ECHO_SAMPLES: usize = delay_samples(SAMPLE_RATE, ECHO_DELAY_MS);

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// High-priority executor for the audio task, driven by a software
/// interrupt so the thread executor's display work cannot starve it.
static EXECUTOR_AUDIO: InterruptExecutor = InterruptExecutor::new();

/// Absolute encoder positions, accumulated by the PIO decoder tasks and
/// sampled (never awaited) by the control task.
static RIGHT_POSITION: AtomicI32 = AtomicI32::new(0);
static LEFT_POSITION: AtomicI32 = AtomicI32::new(0);

/// Debounced button edges. The control task drains at most one per cycle;
/// a full queue drops the newest edge.
static KEY_EVENTS: Channel<CriticalSectionRawMutex, KeyEdge, 8> = Channel::new();

/// Voice-bank snapshots, control task → audio task.
static VOICE_UPDATES: Channel<CriticalSectionRawMutex, VoiceBank, 4> = Channel::new();

/// Shared SPI1 bus — only the LCD sits on it today, but the panel driver
/// goes through a device wrapper so a second device could join.
static SPI_BUS: StaticCell<NoopMutex<RefCell<Spi<'static, SPI1, Blocking>>>> = StaticCell::new();

/// Frame storage: 240×240 RGB565 is far too large for a task arena.
static FRAME_STORE: ConstStaticCell<[u16; FRAME_PIXELS]> = ConstStaticCell::new([0; FRAME_PIXELS]);

/// Double-buffered I2S DMA storage.
static DMA_BUFFERS: ConstStaticCell<[[u32; AUDIO_FRAMES]; 2]> =
    ConstStaticCell::new([[0; AUDIO_FRAMES]; 2]);

/// Echo delay line (600 ms at 44.1 kHz).
static ECHO_LINE: ConstStaticCell<[i16; ECHO_SAMPLES]> = ConstStaticCell::new([0; ECHO_SAMPLES]);

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// Concrete SPI device type for the LCD, sharing SPI_BUS.
type PanelSpi = SpiDevice<'static, NoopRawMutex, Spi<'static, SPI1, Blocking>, Output<'static>>;

/// Concrete display bus for the LCD driver.
type PanelBus = SPIInterface<PanelSpi, Output<'static>>;

type Lcd = LcdDriver<PanelBus, Output<'static>>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrappers that monomorphise the generic encoder loop so it can be
/// spawned as concrete Embassy tasks (tasks cannot be generic).
#[embassy_executor::task]
async fn right_encoder_task(encoder: PioEncoder<'static, PIO0, 0>) {
    track_encoder(encoder, &RIGHT_POSITION).await
}

#[embassy_executor::task]
async fn left_encoder_task(encoder: PioEncoder<'static, PIO0, 1>) {
    track_encoder(encoder, &LEFT_POSITION).await
}

/// Fold decoder steps into an absolute position. The position is never
/// reset during a session.
async fn track_encoder<const SM: usize>(
    mut encoder: PioEncoder<'static, PIO0, SM>,
    position: &'static AtomicI32,
) {
    loop {
        let delta = match encoder.read().await {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        };
        position.fetch_add(delta, Ordering::Relaxed);
    }
}

/// Watch one active-low button and queue debounce-settled edges.
#[embassy_executor::task(pool_size = 2)]
async fn key_task(mut pin: Input<'static>, key: u8) {
    let mut pressed = pin.is_low();
    loop {
        pin.wait_for_any_edge().await;
        Timer::after_millis(KEY_SETTLE_MS).await;
        let now = pin.is_low();
        if now != pressed {
            pressed = now;
            if KEY_EVENTS.try_send(KeyEdge { key, pressed: now }).is_err() {
                warn!("key event queue full; edge dropped");
            }
        }
    }
}

/// Render the drone into double-buffered DMA for the PIO I2S output.
///
/// Snapshot consumption and buffer fill happen while the other buffer is
/// in flight, so the FIFO never starves as long as one fill fits in one
/// buffer period.
#[embassy_executor::task]
async fn audio_task(
    mut i2s: PioI2sOut<'static, PIO1, 0>,
    mut synth: DroneSynth,
    mut chain: OutputChain<'static>,
    buffers: &'static mut [[u32; AUDIO_FRAMES]; 2],
) {
    info!("Audio task started: {}", chain.label());

    let [front, back] = buffers;
    let (mut front, mut back) = (front, back);
    let mut mono = [0i16; AUDIO_FRAMES];

    loop {
        // Kick off the DMA transfer of the finished buffer...
        let transfer = i2s.write(front);

        // ...and prepare the next one while it drains. Parameter writes
        // from the control task land here, between fills.
        while let Ok(update) = VOICE_UPDATES.try_receive() {
            synth.apply(update);
        }
        synth.render(&mut mono);
        chain.process(&mut mono);
        for (slot, &sample) in back.iter_mut().zip(mono.iter()) {
            let half = sample as u16 as u32;
            *slot = (half << 16) | half;
        }

        transfer.await;
        core::mem::swap(&mut front, &mut back);
    }
}

/// The per-cycle control loop: sample → map → voices → publish → render
/// → present → sleep the remainder of the period.
#[embassy_executor::task]
async fn control_task(mut lcd: Lcd, frame_store: &'static mut [u16; FRAME_PIXELS]) {
    let mut frame = FrameBuffer::new(frame_store);
    let mut scene = Scene::new();
    let mut visual = VISUAL_STYLE.build(&mut scene);
    let control = DroneControl::new();

    // The voice set is pressed exactly once, here. From now on only the
    // mute button gates it.
    let mut bank = VoiceBank::new(VISUAL_STYLE.voice_count());
    bank.press_all();
    let mut published = bank;
    if VOICE_UPDATES.try_send(bank).is_err() {
        warn!("voice queue full at startup");
    }

    info!(
        "Control loop started: {} voices, {} ms frame period",
        bank.voice_count(),
        VISUAL_STYLE.frame_period_ms()
    );

    let mut ticker = Ticker::every(Duration::from_millis(VISUAL_STYLE.frame_period_ms()));
    loop {
        // Sample inputs. Positions are plain atomic loads; the key queue
        // is drained one edge per cycle.
        let input = InputFrame {
            right_position: RIGHT_POSITION.load(Ordering::Relaxed),
            left_position: LEFT_POSITION.load(Ordering::Relaxed),
            key: KEY_EVENTS.try_receive().ok(),
        };

        control.apply(&input, &mut bank);

        // Publish to the audio path only when something changed. If the
        // queue is momentarily full the snapshot goes out next cycle.
        if bank != published && VOICE_UPDATES.try_send(bank).is_ok() {
            published = bank;
        }

        visual.render(
            [bank.notes[0].frequency_hz, bank.notes[1].frequency_hz],
            &mut scene,
        );
        compose(&scene, &mut frame);
        if let Err(e) = lcd.present(&frame) {
            error!("LCD present failed: {}", e);
        }

        ticker.next().await;
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_AUDIO.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("bourdon-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // LCD_SCK  → GP10   LCD_MOSI → GP11   LCD_DC  → GP8
    // LCD_CS   → GP9    LCD_RST  → GP12
    // ENC_R    → GP14/GP15        ENC_L   → GP16/GP17
    // KEY_BEND → GP18 (active low, pull-up)
    // KEY_MUTE → GP7  (active low, pull-up)
    // I2S_BCLK → GP3    I2S_LRC  → GP4    I2S_DATA → GP5
    // ———————————————————————————————————————————————————————————————————————

    // —— Display ————————————————————————————————————————————————————————————

    let mut spi_config = spi::Config::default();
    spi_config.frequency = DISPLAY_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let spi_bus = SPI_BUS.init(NoopMutex::new(RefCell::new(spi)));

    let panel_cs = Output::new(p.PIN_9, Level::High);
    let panel_dc = Output::new(p.PIN_8, Level::Low);
    let panel_rst = Output::new(p.PIN_12, Level::High);

    let panel_spi = SpiDevice::new(spi_bus, panel_cs);
    let mut lcd = LcdDriver::new(SPIInterface::new(panel_spi, panel_dc), panel_rst);

    // Bring-up failures are fatal: without a panel there is no instrument
    // to run, so log and stop before any task spawns.
    match lcd.init(&mut Delay) {
        Ok(()) => info!("LCD initialised"),
        Err(e) => {
            error!("LCD init failed: {}", e);
            return;
        }
    }

    // —— Encoders ———————————————————————————————————————————————————————————

    let Pio {
        mut common,
        sm0,
        sm1,
        ..
    } = Pio::new(p.PIO0, Irqs);
    let encoder_prg = PioEncoderProgram::new(&mut common);
    let right_encoder = PioEncoder::new(&mut common, sm0, p.PIN_14, p.PIN_15, &encoder_prg);
    let left_encoder = PioEncoder::new(&mut common, sm1, p.PIN_16, p.PIN_17, &encoder_prg);

    // —— Keys ———————————————————————————————————————————————————————————————

    let bend_key = Input::new(p.PIN_18, Pull::Up);
    let mute_key = Input::new(p.PIN_7, Pull::Up);

    // —— Audio ——————————————————————————————————————————————————————————————

    let Pio {
        common: mut audio_common,
        sm0: audio_sm,
        ..
    } = Pio::new(p.PIO1, Irqs);
    let i2s_prg = PioI2sOutProgram::new(&mut audio_common);
    let i2s = PioI2sOut::new(
        &mut audio_common,
        audio_sm,
        p.DMA_CH0,
        p.PIN_5, // data
        p.PIN_3, // bit clock
        p.PIN_4, // left/right clock
        SAMPLE_RATE,
        BIT_DEPTH,
        CHANNELS,
        &i2s_prg,
    );

    let synth = DroneSynth::new(SAMPLE_RATE, VISUAL_STYLE.voice_count());

    // Resolve the output wiring once: echo when its delay line is
    // provisioned, direct otherwise. Never re-checked after this point.
    let chain = if ECHO_ENABLED {
        OutputChain::WithEcho(Echo::new(ECHO_LINE.take(), EchoConfig::default()))
    } else {
        OutputChain::Direct
    };
    info!("Output chain: {}", chain.label());

    // —— Spawn tasks ————————————————————————————————————————————————————————

    // Audio gets its own interrupt-driven executor above the thread
    // executor, so a long LCD transfer can never delay a buffer fill.
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let audio_spawner = EXECUTOR_AUDIO.start(interrupt::SWI_IRQ_1);
    audio_spawner
        .spawn(audio_task(i2s, synth, chain, DMA_BUFFERS.take()))
        .unwrap();

    spawner.spawn(right_encoder_task(right_encoder)).unwrap();
    spawner.spawn(left_encoder_task(left_encoder)).unwrap();
    spawner.spawn(key_task(bend_key, BEND_KEY)).unwrap();
    spawner.spawn(key_task(mute_key, MUTE_KEY)).unwrap();
    spawner.spawn(control_task(lcd, FRAME_STORE.take())).unwrap();

    info!("All tasks spawned");
}
