//! End-to-end refresh against a recording bus controller
//!
//! The recording controller raises a pending flag after every action that
//! would fire the bus interrupt; `pump` plays the interrupt until the bus
//! goes quiet.

use core::cell::RefCell;

use oledwire_core::bus::TxState;
use oledwire_core::command;
use oledwire_core::graphics::{self, DrawParams, Rect};
use oledwire_core::{DisplayConfig, Error, LockState, Oled};
use oledwire_hal::mock::{RecordingTwi, Transfer, TwiEvent, TwiLog};
use oledwire_hal::BusTiming;

type TestOled<'a> = Oled<'a, RecordingTwi<'a>>;

fn pump(oled: &TestOled<'_>, log: &RefCell<TwiLog>) -> usize {
    let mut interrupts = 0;
    while log.borrow_mut().take_pending() {
        oled.on_interrupt();
        interrupts += 1;
    }
    interrupts
}

fn transfers(log: &RefCell<TwiLog>) -> Vec<Transfer> {
    let log = log.borrow();
    assert!(!log.overflowed(), "event log overflowed");
    log.transfers().collect()
}

#[test]
fn test_init_draw_refresh_scenario() {
    let log = RefCell::new(TwiLog::new());
    let mut frame = [0u8; 1024];
    let config = DisplayConfig::SSD1306_128X64
        .with_frequency(200_000)
        .with_address(0x3C);
    let oled = Oled::new(config, &mut frame, RecordingTwi::new(&log)).unwrap();

    oled.init().unwrap();
    pump(&oled, &log);
    assert_eq!(oled.bus_state(), TxState::Idle);
    assert_eq!(
        log.borrow().events()[0],
        TwiEvent::Enable(BusTiming::from_frequency(16_000_000, 200_000))
    );

    oled.draw(|fb| {
        assert_eq!(fb.set_pixel(200, 0, true), Err(Error::OutOfBounds));
        graphics::rectangle(fb, Rect::new(0, 0, 127, 63), DrawParams::FILL).unwrap();
        graphics::rectangle(
            fb,
            Rect::new(2, 2, 125, 61),
            DrawParams::FILL | DrawParams::COLOR,
        )
        .unwrap();
    });

    log.borrow_mut().clear();
    oled.refresh();
    assert_eq!(oled.lock_state(), LockState::Deferred);
    pump(&oled, &log);
    assert_eq!(oled.lock_state(), LockState::Free);
    assert!(!oled.is_busy());

    let sent = transfers(&log);
    assert_eq!(sent.len(), 16);
    for (page, pair) in sent.chunks(2).enumerate() {
        let page = page as u8;
        assert_eq!(pair[0].device_address(), 0x3C);
        assert_eq!(&pair[0].bytes[..], &command::select_page(page));
        assert_eq!(&pair[0].bytes[..], &[0x80, 0x00, 0x80, 0x10, 0x80, 0xB0 | page]);

        let write = &pair[1].bytes;
        assert_eq!(write.len(), 129);
        assert_eq!(write[0], 0x40);
        let row = &write[1..];
        // border columns stay dark, the inner rectangle is lit
        assert_eq!(row[0], 0x00);
        assert_eq!(row[127], 0x00);
        let inner = match page {
            0 => 0b1111_1100,
            7 => 0b0011_1111,
            _ => 0xFF,
        };
        assert!(row[2..126].iter().all(|&b| b == inner), "page {}", page);
    }
}

#[test]
fn test_lock_is_held_until_last_page() {
    let log = RefCell::new(TwiLog::new());
    let mut frame = [0u8; 1024];
    let oled = Oled::new(DisplayConfig::SSD1306_128X64, &mut frame, RecordingTwi::new(&log)).unwrap();

    oled.refresh();
    let mut completed = 0;
    while log.borrow_mut().take_pending() {
        assert!(oled.try_lock().is_none(), "lock free after {} transfers", completed);
        oled.on_interrupt();
        completed = log.borrow().transfers().count();
    }

    assert_eq!(completed, 16);
    assert!(oled.try_lock().is_some());
}

#[test]
fn test_half_height_panel() {
    let log = RefCell::new(TwiLog::new());
    let mut frame = [0u8; 512];
    let oled = Oled::new(DisplayConfig::SSD1306_128X32, &mut frame, RecordingTwi::new(&log)).unwrap();

    oled.draw(|fb| fb.fill(true));
    oled.refresh();
    pump(&oled, &log);

    let sent = transfers(&log);
    assert_eq!(sent.len(), 8);
    assert_eq!(oled.current_page(), 4);
    assert_eq!(&sent[6].bytes[..], &command::select_page(3));
    assert!(sent[7].bytes[1..].iter().all(|&b| b == 0xFF));
}

#[test]
fn test_commands_queue_behind_refresh() {
    let log = RefCell::new(TwiLog::new());
    let mut frame = [0u8; 512];
    let oled = Oled::new(DisplayConfig::SSD1306_128X32, &mut frame, RecordingTwi::new(&log)).unwrap();

    oled.refresh();
    // waits for the whole refresh to give the lock back
    oled.set_brightness_with(0x42, || {
        if log.borrow_mut().take_pending() {
            oled.on_interrupt();
        }
    });
    pump(&oled, &log);

    let sent = transfers(&log);
    assert_eq!(sent.len(), 9);
    assert_eq!(&sent[8].bytes[..], &[0x80, 0x81, 0x80, 0x42]);
    assert_eq!(oled.lock_state(), LockState::Free);
}

#[test]
fn test_display_power_and_inversion() {
    let log = RefCell::new(TwiLog::new());
    let mut frame = [0u8; 1024];
    let oled = Oled::new(DisplayConfig::default(), &mut frame, RecordingTwi::new(&log)).unwrap();

    oled.set_display_on(true);
    pump(&oled, &log);
    oled.set_inverted(true);
    pump(&oled, &log);

    let sent = transfers(&log);
    assert_eq!(&sent[0].bytes[..], &[0x80, 0xAF]);
    assert_eq!(&sent[1].bytes[..], &[0x80, 0xA7]);
}

#[test]
fn test_interrupts_per_page_write() {
    let log = RefCell::new(TwiLog::new());
    let mut frame = [0u8; 1024];
    let oled = Oled::new(DisplayConfig::SSD1306_128X64, &mut frame, RecordingTwi::new(&log)).unwrap();

    oled.refresh();
    // start + address + bytes, then the stop for each transaction
    let per_page = (1 + 1 + 6) + (1 + 1 + 129);
    assert_eq!(pump(&oled, &log), 8 * per_page);
}
