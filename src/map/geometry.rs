use crate::braille::BrailleCanvas;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a filled circle (pin heads)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Midpoint circle outline (the globe's limb)
pub fn draw_ring(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            canvas.set_pixel_signed(cx + px, cy + py);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Fill a triangle given in pixel coordinates, clipped to the canvas.
/// Dots whose centre lies inside (or on an edge) are set.
pub fn fill_triangle(canvas: &mut BrailleCanvas, a: (f64, f64), b: (f64, f64), c: (f64, f64)) {
    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        draw_line(canvas, a.0 as i32, a.1 as i32, b.0 as i32, b.1 as i32);
        draw_line(canvas, b.0 as i32, b.1 as i32, c.0 as i32, c.1 as i32);
        return;
    }

    let max_x = canvas.pixel_width() as f64 - 1.0;
    let max_y = canvas.pixel_height() as f64 - 1.0;
    let x0 = a.0.min(b.0).min(c.0).floor().max(0.0);
    let x1 = a.0.max(b.0).max(c.0).ceil().min(max_x);
    let y0 = a.1.min(b.1).min(c.1).floor().max(0.0);
    let y1 = a.1.max(b.1).max(c.1).ceil().min(max_y);
    if x0 > x1 || y0 > y1 {
        return;
    }

    let sign = area.signum();
    for y in y0 as usize..=y1 as usize {
        for x in x0 as usize..=x1 as usize {
            let p = (x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(b, c, p) * sign;
            let w1 = edge(c, a, p) * sign;
            let w2 = edge(a, b, p) * sign;
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                canvas.set_pixel(x, y);
            }
        }
    }

    // Thin slivers can miss every dot centre
    for (p, q) in [(a, b), (b, c), (c, a)] {
        draw_line(canvas, p.0 as i32, p.1 as i32, q.0 as i32, q.1 as i32);
    }
}

#[inline(always)]
fn edge(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}
