use std::f64::consts::{PI, TAU};

use ratatui::{
    style::Color,
    widgets::canvas::{Painter, Shape},
};

/// Circle sizes of the progress ring, in canvas units.
///
/// The painted arc sits on `normalized_radius`; two thin guide circles mark
/// its inner and outer edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub radius: f64,
    pub stroke: f64,
}

impl RingGeometry {
    pub fn new(radius: f64, stroke: f64) -> Self {
        Self { radius, stroke }
    }

    pub fn normalized_radius(&self) -> f64 {
        self.radius - self.stroke * 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        self.normalized_radius() - self.stroke / 2.0
    }

    pub fn outer_radius(&self) -> f64 {
        self.normalized_radius() + self.stroke / 2.0
    }

    pub fn circumference(&self) -> f64 {
        self.normalized_radius() * 2.0 * PI
    }

    /// Points per full turn so that neighbouring arc points touch
    pub fn resolution(&self) -> usize {
        (self.circumference() * 2.0).ceil().max(8.0) as usize
    }

    /// Unpainted length of the ring at `percent`: the full circumference at
    /// 0, nothing at 100.
    pub fn dash_offset(&self, percent: f64) -> f64 {
        let c = self.circumference();
        c - percent.clamp(0.0, 100.0) / 100.0 * c
    }

    /// Angle covered by the painted arc, taken from the dash offset
    pub fn sweep(&self, percent: f64) -> f64 {
        let r = self.normalized_radius();
        if r <= 0.0 {
            return 0.0;
        }
        (self.circumference() - self.dash_offset(percent)) / r
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::new(100.0, 8.0)
    }
}

/// Point at `angle` radians clockwise from 12 o'clock
pub fn clock_point(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), radius * angle.cos())
}

/// Points along an arc of `sweep` radians, starting at 12 o'clock
pub fn arc_points(radius: f64, sweep: f64, steps: usize) -> impl Iterator<Item = (f64, f64)> {
    let sweep = sweep.clamp(0.0, TAU);
    let count = ((steps as f64) * sweep / TAU).ceil() as usize;
    (0..=count).map(move |i| {
        let angle = if count == 0 {
            0.0
        } else {
            sweep * i as f64 / count as f64
        };
        clock_point(radius, angle)
    })
}

/// Canvas shape: guide circles plus the painted progress arc
pub struct RingShape {
    pub geometry: RingGeometry,
    pub percent: f64,
    pub fill: Color,
    pub guide: Color,
}

impl Shape for RingShape {
    fn draw(&self, painter: &mut Painter<'_, '_>) {
        let g = self.geometry;
        let steps = g.resolution();
        for r in [g.inner_radius(), g.outer_radius()] {
            for (x, y) in arc_points(r, TAU, steps) {
                if let Some((px, py)) = painter.get_point(x, y) {
                    painter.paint(px, py, self.guide);
                }
            }
        }

        if self.percent <= 0.0 {
            return;
        }
        let sweep = g.sweep(self.percent);
        let bands = (g.stroke.ceil() as usize).max(1);
        for band in 0..=bands {
            let r = g.inner_radius() + g.stroke * band as f64 / bands as f64;
            for (x, y) in arc_points(r, sweep, steps) {
                if let Some((px, py)) = painter.get_point(x, y) {
                    painter.paint(px, py, self.fill);
                }
            }
        }
    }
}
