use console::Style;
use lktrack_core::config::{TrackingConfig, TrackingMethod};
use lktrack_core::frame::Rect;
use lktrack_core::track::Motion;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
        }
    }
}

pub fn print_config_summary(config: &TrackingConfig, frames: usize, rects: usize) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("lktrack"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(7)));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Method"),
        s.method.apply_to(&config.method)
    );
    if let TrackingMethod::Robust(ref robust) = config.method {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Thresholds"),
            s.value.apply_to(format!(
                "huber {} / tukey {}",
                robust.huber_delta, robust.tukey_c
            ))
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(config.tracker.threshold)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Iterations"),
        s.value.apply_to(config.tracker.max_iterations)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(frames)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rectangles"),
        s.value.apply_to(rects)
    );
    println!();
}

pub fn print_motion(rect: &Rect, motion: &Motion) {
    let s = Styles::new();
    let moved = motion.apply_to_rect(rect);
    let t = motion.translation();

    println!("  {:<14}{}", s.label.apply_to("Rect"), s.value.apply_to(rect));
    match motion {
        Motion::Translation(_) => {}
        Motion::Affine(warp) => {
            let [r0, r1] = warp.rows();
            println!(
                "  {:<14}{}",
                s.label.apply_to("Warp"),
                s.value.apply_to(format!(
                    "[{:.5} {:.5} {:.4}; {:.5} {:.5} {:.4}]",
                    r0[0], r0[1], r0[2], r1[0], r1[1], r1[2]
                ))
            );
        }
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Shift"),
        s.method.apply_to(format!("dx {:+.4}  dy {:+.4}", t.dx, t.dy))
    );
    println!("  {:<14}{}", s.label.apply_to("Moved to"), s.value.apply_to(moved));
    println!();
}
