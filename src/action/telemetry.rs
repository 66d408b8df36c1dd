use std::collections::BTreeMap;
use std::fmt::Display;

use crate::math::Vector2;

/// A single recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    SetStroke(String),
    StrokeWidth(f64),
    Line { from: Vector2, to: Vector2 },
    Circle { center: Vector2, radius: f64 },
    Polyline(Vec<Vector2>),
}

/// Field overlay drawing surface. Commands are only recorded; rendering is
/// up to whoever receives the packet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    ops: Vec<CanvasOp>,
}

impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stroke(&mut self, color: impl Into<String>) -> &mut Self {
        self.ops.push(CanvasOp::SetStroke(color.into()));
        self
    }

    pub fn set_stroke_width(&mut self, width: f64) -> &mut Self {
        self.ops.push(CanvasOp::StrokeWidth(width));
        self
    }

    pub fn stroke_line(&mut self, from: Vector2, to: Vector2) -> &mut Self {
        self.ops.push(CanvasOp::Line { from, to });
        self
    }

    pub fn stroke_circle(&mut self, center: Vector2, radius: f64) -> &mut Self {
        self.ops.push(CanvasOp::Circle { center, radius });
        self
    }

    pub fn stroke_polyline(&mut self, points: Vec<Vector2>) -> &mut Self {
        self.ops.push(CanvasOp::Polyline(points));
        self
    }

    /// Appends every command recorded on `other`.
    pub fn extend(&mut self, other: &Canvas) {
        self.ops.extend_from_slice(&other.ops);
    }

    #[must_use]
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Per-tick output that actions write into.
#[derive(Debug, Clone, Default)]
pub struct TelemetryPacket {
    fields: BTreeMap<String, String>,
    overlay: Canvas,
}

impl TelemetryPacket {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under `key`, replacing any earlier value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Display) {
        self.fields.insert(key.into(), value.to_string());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn field_overlay(&mut self) -> &mut Canvas {
        &mut self.overlay
    }

    #[must_use]
    pub fn overlay(&self) -> &Canvas {
        &self.overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_replaces_previous_value() {
        let mut packet = TelemetryPacket::new();
        packet.put("x", 1.5);
        packet.put("state", "idle");
        packet.put("x", 2);
        assert_eq!(packet.get("x"), Some("2"));
        assert_eq!(packet.get("state"), Some("idle"));
        assert_eq!(packet.get("y"), None);
        assert_eq!(packet.fields().count(), 2);
    }

    #[test]
    fn canvas_records_commands_in_order() {
        let mut canvas = Canvas::new();
        canvas
            .set_stroke("#4CAF50")
            .stroke_line(Vector2::zeros(), Vector2::new(1.0, 0.0))
            .stroke_circle(Vector2::new(1.0, 0.0), 0.5);

        let mut packet = TelemetryPacket::new();
        packet.field_overlay().extend(&canvas);
        assert_eq!(packet.overlay().ops().len(), 3);
        assert_eq!(packet.overlay().ops()[0], CanvasOp::SetStroke("#4CAF50".into()));
        assert_eq!(
            packet.overlay().ops()[2],
            CanvasOp::Circle {
                center: Vector2::new(1.0, 0.0),
                radius: 0.5
            }
        );
    }
}
