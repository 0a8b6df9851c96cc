//! Scan order: where each decoded sample lands in the buffer
//!
//! Samples fill a stripe `width` columns wide, row by row, then wrap to
//! the next stripe to the right once the stripe is as tall as the buffer.
//! `mirror` runs each row right to left and `flip` runs rows bottom to
//! top. Coordinates are logical: one unit is a `scale` x `scale` block.

use crate::params::ParameterSet;

#[derive(Debug, Clone)]
pub struct Scan {
    width: usize,
    flip: bool,
    mirror: bool,
    /// Logical buffer size (buffer pixels divided by scale)
    cols: usize,
    rows: usize,
    /// First column of the current stripe
    left: usize,
    x: usize,
    y: usize,
    done: bool,
}

impl Scan {
    pub fn new(params: &ParameterSet, buf_width: usize, buf_height: usize) -> Self {
        let scale = params.scale.max(1);
        let width = params.width.max(1);
        let rows = buf_height / scale;
        let cols = buf_width / scale;
        Self {
            width,
            flip: params.flip,
            mirror: params.mirror,
            cols,
            rows,
            left: 0,
            x: if params.mirror { width - 1 } else { 0 },
            y: if params.flip { rows.saturating_sub(1) } else { 0 },
            done: cols == 0 || rows == 0,
        }
    }

    /// Step within the current row
    fn next_x(&mut self) -> bool {
        if self.mirror {
            if self.x == self.left {
                return false;
            }
            self.x -= 1;
        } else {
            self.x += 1;
            if self.x == self.left + self.width {
                return false;
            }
        }
        true
    }

    /// Start the next row, wrapping into the next stripe at the edge
    fn next_y(&mut self) -> bool {
        if self.flip {
            if self.y == 0 {
                self.left = self.left.saturating_add(self.width);
                self.y = self.rows;
            }
            self.y -= 1;
        } else {
            self.y += 1;
            if self.y == self.rows {
                self.left = self.left.saturating_add(self.width);
                self.y = 0;
            }
        }
        self.x = self.left;
        if self.mirror {
            self.x = self.x.saturating_add(self.width - 1);
        }
        self.left < self.cols
    }
}

impl Iterator for Scan {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.done {
            return None;
        }
        let position = (self.x, self.y);
        self.done = !(self.next_x() || self.next_y());
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn scan(width: usize, flip: bool, mirror: bool, buf: (usize, usize)) -> Vec<(usize, usize)> {
        let params = ParameterSet {
            width,
            flip,
            mirror,
            ..ParameterSet::new()
        };
        Scan::new(&params, buf.0, buf.1).collect()
    }

    #[test]
    fn test_row_major_single_stripe() {
        let order = scan(3, false, false, (3, 2));
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_stripes_wrap_to_the_right() {
        let order = scan(2, false, false, (4, 2));
        assert_eq!(
            order,
            vec![
                (0, 0),
                (1, 0),
                (0, 1),
                (1, 1),
                (2, 0),
                (3, 0),
                (2, 1),
                (3, 1)
            ]
        );
    }

    #[test]
    fn test_flip_restarts_each_stripe_at_the_bottom() {
        let order = scan(1, true, false, (2, 3));
        assert_eq!(order, vec![(0, 2), (0, 1), (0, 0), (1, 2), (1, 1), (1, 0)]);
    }

    #[test]
    fn test_visits_every_cell_once() {
        for width in [1, 2, 4, 8] {
            for flip in [false, true] {
                for mirror in [false, true] {
                    let order = scan(width, flip, mirror, (8, 5));
                    let unique: HashSet<_> = order.iter().copied().collect();
                    assert_eq!(order.len(), 40);
                    assert_eq!(unique.len(), 40);
                    assert!(order.iter().all(|&(x, y)| x < 8 && y < 5));
                }
            }
        }
    }

    #[test]
    fn test_flip_and_mirror_reverse_the_order() {
        let forward = scan(6, false, false, (6, 4));
        let mut backward = scan(6, true, true, (6, 4));
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_wide_rows_overhang_the_buffer() {
        let order = scan(5, false, false, (3, 2));
        assert_eq!(order.len(), 10);
        assert_eq!(order[4], (4, 0));
        assert_eq!(order[5], (0, 1));
    }

    #[test]
    fn test_scale_shrinks_logical_size() {
        let params = ParameterSet {
            width: 2,
            scale: 2,
            ..ParameterSet::new()
        };
        let order: Vec<_> = Scan::new(&params, 4, 5).collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_empty_buffer() {
        assert!(scan(4, false, false, (0, 10)).is_empty());
        assert!(scan(4, true, true, (10, 0)).is_empty());
    }
}
