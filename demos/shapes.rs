//! Tiles an image over a window, then draws shapes and text on top.
//!
//! Usage: `cargo run --example shapes [image] [font.ttf]`

use ezdraw::{Color, Font, Image, Window};

fn badge() -> ezdraw::Result<Image> {
    let mut window = Window::offscreen(32, 32)?;
    window.draw(|w| {
        w.set_fill(Color::YELLOW);
        w.set_stroke(Color::BROWN);
        w.clear()?;
        w.circle(16, 16, 12)
    })?;
    Ok(window.screenshot())
}

fn random_color() -> Color {
    Color::rgb(fastrand::u8(..), fastrand::u8(..), fastrand::u8(..))
}

fn random_lines(window: &mut Window, count: usize) -> ezdraw::Result<()> {
    let (width, height) = (window.width() as i32, window.height() as i32);
    for _ in 0..count {
        window.set_stroke(random_color());
        window.line(
            fastrand::i32(..width),
            fastrand::i32(..height),
            fastrand::i32(..width),
            fastrand::i32(..height),
        )?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()?;

    let mut args = std::env::args().skip(1);
    let image_path = args.next();
    let font_path = args.next();

    ezdraw::init()?;

    let mut win = Window::builder().title("awesome test window").build()?;

    let img = match &image_path {
        Some(path) => Image::open(path)?,
        None => badge()?,
    };

    win.set_auto_update(false)?;
    let mut y = 0;
    while y < win.height() {
        let mut x = 0;
        while x < win.width() {
            win.image(x as i32, y as i32, &img)?;
            x += img.width();
        }
        y += img.height();
    }
    win.set_auto_update(true)?;
    if let Some(path) = &image_path {
        win.image_file(win.width() as i32 / 2, win.height() as i32 / 2, path)?;
    }

    let (w, h) = (win.width() as i32, win.height() as i32);
    win.set_stroke(Color::BLUE);
    win.set_fill(Color::GRAY);
    win.line(0, 0, w, h)?;
    win.circle(w / 2, h / 2, w / 3)?;
    win.rect(10, 10, 50, 50)?;

    win.push_context();
    win.set_stroke(Color::RED);
    win.set_fill(Color::NONE);
    win.circle(100, 100, 50)?;
    win.pop_context()?;

    win.set_stroke(Color::GREEN);
    win.line(0, 0, w / 2, h)?;
    win.circle(200, 100, 50)?;
    win.line(0, 0, w, h / 2)?;

    win.set_stroke(Color::BLACK);
    win.push_context();
    win.text(0, 0, "hello world")?;
    let big = match &font_path {
        Some(path) => Some(Font::open(path, 80.)?),
        None => win.font().map(|font| font.with_size(80.)),
    };
    if let Some(big) = big {
        win.set_font(big);
    }
    win.set_stroke(Color::GREEN);
    win.text(0, 20, "hello world")?;
    win.pop_context()?;
    win.text(0, 100, "hello world")?;

    random_lines(&mut win, 100)?;
    win.draw(|win| random_lines(win, 100))?;

    let key = ezdraw::waitkey()?;
    log::info!("pressed {}", key);

    ezdraw::cleanup()?;
    Ok(())
}
