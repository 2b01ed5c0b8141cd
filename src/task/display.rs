//! # Display
//! The SSD1306 128x64 OLED behind the clock's `Display` contract.
//!
//! Drawing goes into the driver's frame buffer through embedded-graphics; `present` flushes it
//! over I2C. Driver errors are logged and dropped, a missed frame is redrawn on the next tick.

use defmt::{Debug2Format, info, warn};
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X9},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use pico_radio_clock::Display;
use ssd1306::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};

/// The concrete driver type
type Oled = Ssd1306<
    I2CInterface<I2c<'static, I2C0, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// The panel, ready to draw
pub struct OledDisplay {
    /// The driver with its frame buffer
    oled: Oled,
    /// Inversion currently applied to the panel, to avoid resending it every frame
    inverted: bool,
}

impl OledDisplay {
    /// Set up the panel on the given bus
    pub fn new(i2c: I2c<'static, I2C0, Blocking>) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut oled = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        match oled.init() {
            Ok(()) => info!("Display initialized"),
            Err(e) => warn!("Display init failed: {}", Debug2Format(&e)),
        }
        Self { oled, inverted: false }
    }

    /// Draw a primitive, logging a failure
    fn draw<D: Drawable<Color = BinaryColor>>(&mut self, item: &D) {
        if let Err(e) = item.draw(&mut self.oled) {
            warn!("Draw failed: {}", Debug2Format(&e));
        }
    }
}

impl Display for OledDisplay {
    fn clear(&mut self) {
        self.oled.clear_buffer();
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        let style = MonoTextStyle::new(&FONT_6X9, BinaryColor::On);
        let text = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top);
        self.draw(&text);
    }

    fn draw_filled_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let rect = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On));
        self.draw(&rect);
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let rect = Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1));
        self.draw(&rect);
    }

    #[allow(clippy::cast_possible_wrap)] // lines are at most 128 px long
    fn draw_hline(&mut self, x: i32, y: i32, length: u32) {
        let end = x + length.saturating_sub(1) as i32;
        let line = Line::new(Point::new(x, y), Point::new(end, y))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1));
        self.draw(&line);
    }

    fn set_inverted(&mut self, inverted: bool) {
        if inverted == self.inverted {
            return;
        }
        match self.oled.set_invert(inverted) {
            Ok(()) => self.inverted = inverted,
            Err(e) => warn!("Display invert failed: {}", Debug2Format(&e)),
        }
    }

    fn present(&mut self) {
        if let Err(e) = self.oled.flush() {
            warn!("Display flush failed: {}", Debug2Format(&e));
        }
    }
}
