//! Field dimensions and the geometry derived from them
//!
//! Paddle, ball and brick sizes all follow the field so the game plays the
//! same on a phone and on a desktop monitor.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Play field as reported by the rendering collaborator (layout units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    /// Device pixels per layout unit (informational; physics runs in layout units)
    pub scale_factor: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Size relative to the reference field, averaged over both axes
    pub fn viewport_scale(&self) -> f32 {
        let width_scale = (self.width / REFERENCE_WIDTH).min(MAX_VIEWPORT_SCALE);
        let height_scale = (self.height / REFERENCE_HEIGHT).min(MAX_VIEWPORT_SCALE);
        (width_scale + height_scale) / 2.0
    }

    pub fn is_desktop(&self) -> bool {
        self.width > DESKTOP_BREAKPOINT
    }
}

/// Entity sizes for a given field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_top: f32,
    pub ball_radius: f32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_left: f32,
    pub brick_top: f32,
    /// Rows that fit above the paddle area
    pub max_rows: u32,
}

impl Layout {
    pub fn compute(field: &Field, columns: u32) -> Self {
        let scale = field.viewport_scale();

        let paddle_height = (PADDLE_BASE_HEIGHT * scale).clamp(12.0, 22.0);
        let mut paddle_width = paddle_height * PADDLE_ASPECT;
        if field.is_desktop() {
            paddle_width *= 1.5;
        }
        let paddle_width = paddle_width
            .min(field.width * PADDLE_MAX_WIDTH_SHARE)
            .max(PADDLE_MIN_WIDTH)
            .min(field.width);
        let paddle_top = field.height - paddle_height - PADDLE_BOTTOM_GAP;

        let ball_radius = (BALL_BASE_RADIUS * scale).clamp(BALL_MIN_RADIUS, BALL_MAX_RADIUS);

        let mut brick_height = BRICK_BASE_HEIGHT;
        if field.is_desktop() {
            brick_height *= BRICK_DESKTOP_SCALE;
        }
        let mut brick_width = brick_height * BRICK_ASPECT;
        let brick_padding = (brick_height * 0.12).clamp(1.0, 3.0);

        let cols = columns.max(1) as f32;
        let gaps = brick_padding * (cols - 1.0);
        if brick_width * cols + gaps > field.width {
            // Shrink uniformly until the row fits
            let fit = ((field.width - gaps) / (brick_width * cols)).max(0.0);
            brick_width *= fit;
            brick_height *= fit;
        }
        let total_width = brick_width * cols + gaps;
        let brick_left = (field.width - total_width) / 2.0;
        let brick_top = (field.height / 8.0).clamp(50.0, 80.0);

        let row_pitch = brick_height + brick_padding;
        let max_rows = if row_pitch > 0.0 {
            (((field.height * BRICK_AREA_SHARE - brick_top) / row_pitch).floor()).max(1.0) as u32
        } else {
            1
        };

        Self {
            paddle_width,
            paddle_height,
            paddle_top,
            ball_radius,
            brick_width,
            brick_height,
            brick_padding,
            brick_left,
            brick_top,
            max_rows,
        }
    }
}
