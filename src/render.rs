//! ASCII sheet layouts for the CLI.

use crate::types::{FreeRect, Placement, Rect};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Draws one sheet to scale: part outlines with their dimensions, usable
/// offcuts dotted so they stand out as keep-material.
pub fn render_sheet(stock: Rect, placements: &[Placement], offcuts: &[FreeRect]) -> String {
    let scale = f64::min(MAX_WIDTH / stock.w as f64, MAX_HEIGHT / stock.h as f64);
    let grid_w = (stock.w as f64 * scale).round() as usize;
    let grid_h = (stock.h as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for off in offcuts {
        let (sx, sy, sw, sh) = scaled(off.x, off.y, off.rect, scale);
        if sw == 0 || sh == 0 {
            continue;
        }
        for row in grid.iter_mut().take(sy + sh).skip(sy + 1) {
            for cell in row.iter_mut().take(sx + sw).skip(sx + 1) {
                *cell = '.';
            }
        }
        label(&mut grid, sx, sy, sw, sh, &format!("~{}", off.rect));
    }

    for p in placements {
        let (sx, sy, sw, sh) = scaled(p.x, p.y, p.rect, scale);
        if sw == 0 || sh == 0 {
            continue;
        }
        draw_rect(&mut grid, sx, sy, sw, sh);
        label(&mut grid, sx, sy, sw, sh, &p.rect.to_string());
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn scaled(x: u32, y: u32, rect: Rect, scale: f64) -> (usize, usize, usize, usize) {
    (
        (x as f64 * scale).round() as usize,
        (y as f64 * scale).round() as usize,
        (rect.w as f64 * scale).round() as usize,
        (rect.h as f64 * scale).round() as usize,
    )
}

fn label(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    if w <= 2 || h == 0 {
        return;
    }
    let cx = x + w / 2;
    let cy = y + h / 2;
    let start_x = cx.saturating_sub(chars.len() / 2);
    for (i, &ch) in chars.iter().enumerate() {
        let gx = start_x + i;
        if gx > x && gx < x + w && cy > y && cy < y + h && cy < grid.len() && gx < grid[cy].len() {
            grid[cy][gx] = ch;
        }
    }
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    for i in x..=x + w {
        if i < cols {
            if y < rows {
                grid[y][i] = if grid[y][i] == '|' || grid[y][i] == '+' {
                    '+'
                } else {
                    '-'
                };
            }
            if y + h < rows {
                grid[y + h][i] = if grid[y + h][i] == '|' || grid[y + h][i] == '+' {
                    '+'
                } else {
                    '-'
                };
            }
        }
    }

    for j in y..=y + h {
        if j < rows {
            if x < cols {
                grid[j][x] = if grid[j][x] == '-' || grid[j][x] == '+' {
                    '+'
                } else {
                    '|'
                };
            }
            if x + w < cols {
                grid[j][x + w] = if grid[j][x + w] == '-' || grid[j][x + w] == '+' {
                    '+'
                } else {
                    '|'
                };
            }
        }
    }

    for &cx in &[x, x + w] {
        for &cy in &[y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(w: u32, h: u32, x: u32, y: u32) -> Placement {
        Placement {
            part_id: "p".into(),
            rect: Rect::new(w, h),
            x,
            y,
            rotated: false,
        }
    }

    #[test]
    fn test_render_single_piece() {
        let stock = Rect::new(100, 50);
        let output = render_sheet(stock, &[placement(100, 50, 0, 0)], &[]);
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("100x50"));
    }

    #[test]
    fn test_render_offcut_is_dotted_and_labelled() {
        let stock = Rect::new(100, 100);
        let offcut = FreeRect {
            x: 50,
            y: 0,
            rect: Rect::new(50, 100),
        };
        let output = render_sheet(stock, &[placement(50, 100, 0, 0)], &[offcut]);
        assert!(output.contains('.'));
        assert!(output.contains("~50x100"));
    }

    #[test]
    fn test_render_empty_sheet_keeps_border() {
        let output = render_sheet(Rect::new(100, 100), &[], &[]);
        assert!(output.contains('+'));
    }
}
