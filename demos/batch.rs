//! Grouped drawing with `Window::draw`, image regions, and `waitkey`.
//!
//! Usage: `cargo run --example batch [image]`

use ezdraw::{Color, Image, Region, Window};

fn sweep(win: &mut Window, color: Color) -> ezdraw::Result<()> {
    let (width, height) = (win.width() as i32, win.height() as i32);
    win.draw(|win| {
        win.set_stroke(color);
        for x in (0..=width).step_by(20) {
            win.line(x, 0, width - x, height)?;
        }
        for y in (0..=height).step_by(20) {
            win.line(0, y, width, height - y)?;
        }
        Ok(())
    })
}

fn gradient(width: u32, height: u32) -> ezdraw::Result<Image> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                0x80,
                0xff,
            ]);
        }
    }
    Image::from_rgba(width, height, data)
}

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()?;

    ezdraw::init()?;
    let mut win = Window::new()?;

    sweep(&mut win, Color::BLUE)?;
    ezdraw::delay(100)?;
    sweep(&mut win, Color::RED)?;
    ezdraw::delay(100)?;

    let img = match std::env::args().nth(1) {
        Some(path) => Image::open(path)?,
        None => gradient(64, 64)?,
    };
    win.image(0, 0, &img)?;
    ezdraw::delay(100)?;
    win.image_region(
        Some(Region::new(0, 0, img.width() / 2, img.height() / 2)),
        None,
        &img,
    )?;
    ezdraw::delay(100)?;
    win.image_region(
        None,
        Some(Region::new(0, 0, win.width(), win.height())),
        &img,
    )?;

    let (width, height) = (win.width() as i32, win.height() as i32);
    win.draw(|win| {
        win.set_stroke(Color::BROWN);
        win.set_fill(Color::YELLOW);
        win.circle(width / 2, height / 2, width / 5)
    })?;

    println!("{}", ezdraw::waitkey()?);

    ezdraw::cleanup()?;
    Ok(())
}
