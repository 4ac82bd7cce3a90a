//! Stroke playback through mouse input using enigo
//!
//! A pointer has a single contact, so strokes are played one after another
//! in start-time order. Each stroke is press, timed moves along its path,
//! release.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use std::thread;
use std::time::{Duration, Instant};

use crate::automation::types::{DisplaySize, GestureDescription, Point, StrokeDescription};

/// Interval between intermediate pointer moves while traversing a path
const MOVE_STEP: Duration = Duration::from_millis(16);

/// Input controller that plays gesture strokes with the mouse
pub struct InputController {
    enigo: Enigo,
}

impl InputController {
    /// Create a new input controller
    pub fn new() -> anyhow::Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow::anyhow!("Failed to create input controller: {:?}", e))?;
        Ok(Self { enigo })
    }

    /// Size of the main display
    pub fn main_display(&self) -> anyhow::Result<DisplaySize> {
        let (width, height) = self
            .enigo
            .main_display()
            .map_err(|e| anyhow::anyhow!("Failed to query main display: {:?}", e))?;
        Ok(DisplaySize::new(width.max(0) as u32, height.max(0) as u32))
    }

    /// Play every stroke of a gesture, blocking until the last one ends
    pub fn play(&mut self, gesture: &GestureDescription) -> anyhow::Result<()> {
        let started = Instant::now();
        let mut strokes: Vec<&StrokeDescription> = gesture.strokes.iter().collect();
        strokes.sort_by_key(|s| s.start_time_ms);

        for stroke in strokes {
            if let Some(wait) = stroke.start_time().checked_sub(started.elapsed()) {
                thread::sleep(wait);
            }
            self.play_stroke(stroke)?;
        }
        Ok(())
    }

    fn play_stroke(&mut self, stroke: &StrokeDescription) -> anyhow::Result<()> {
        let first = stroke
            .path
            .first()
            .ok_or_else(|| anyhow::anyhow!("Stroke has an empty path"))?;

        self.move_to(*first)?;
        self.button(Direction::Press)?;

        let result = if stroke.is_stationary() {
            thread::sleep(stroke.duration());
            Ok(())
        } else {
            self.traverse(stroke)
        };

        // Always lift the contact, even when a move failed midway
        let released = self.button(Direction::Release);
        result.and(released)
    }

    fn traverse(&mut self, stroke: &StrokeDescription) -> anyhow::Result<()> {
        let started = Instant::now();
        for (point, at) in timeline(&stroke.path, stroke.duration(), MOVE_STEP) {
            if let Some(wait) = at.checked_sub(started.elapsed()) {
                thread::sleep(wait);
            }
            self.move_to(point)?;
        }
        Ok(())
    }

    fn move_to(&mut self, point: Point) -> anyhow::Result<()> {
        self.enigo
            .move_mouse(point.x as i32, point.y as i32, Coordinate::Abs)
            .map_err(|e| anyhow::anyhow!("Failed to move mouse: {:?}", e))
    }

    fn button(&mut self, direction: Direction) -> anyhow::Result<()> {
        self.enigo
            .button(Button::Left, direction)
            .map_err(|e| anyhow::anyhow!("Failed to {:?} mouse button: {:?}", direction, e))
    }
}

/// Pointer positions along `path` and the offset at which to reach each one.
///
/// Time is spread over segments in proportion to their length. The final
/// point is always reached exactly at `duration`.
pub fn timeline(path: &[Point], duration: Duration, step: Duration) -> Vec<(Point, Duration)> {
    let segments: Vec<(Point, Point, f64)> = path
        .windows(2)
        .map(|pair| (pair[0], pair[1], distance(pair[0], pair[1])))
        .collect();
    let total: f64 = segments.iter().map(|s| s.2).sum();

    let Some(last) = path.last().copied() else {
        return Vec::new();
    };
    if total == 0.0 || step.is_zero() {
        return vec![(last, duration)];
    }

    let steps = (duration.as_secs_f64() / step.as_secs_f64()).ceil().max(1.0) as u32;
    let mut points = Vec::with_capacity(steps as usize);

    for i in 1..=steps {
        let fraction = f64::from(i) / f64::from(steps);
        let mut remaining = total * fraction;
        let mut position = last;
        for &(from, to, length) in &segments {
            if remaining <= length {
                let t = if length == 0.0 { 1.0 } else { remaining / length };
                position = lerp(from, to, t);
                break;
            }
            remaining -= length;
        }
        points.push((position, duration.mul_f64(fraction)));
    }

    points
}

fn distance(a: Point, b: Point) -> f64 {
    let dx = f64::from(b.x) - f64::from(a.x);
    let dy = f64::from(b.y) - f64::from(a.y);
    (dx * dx + dy * dy).sqrt()
}

fn lerp(from: Point, to: Point, t: f64) -> Point {
    let x = f64::from(from.x) + (f64::from(to.x) - f64::from(from.x)) * t;
    let y = f64::from(from.y) + (f64::from(to.y) - f64::from(from.y)) * t;
    Point::new(x.round() as u32, y.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_ends_on_last_point() {
        let path = [Point::new(0, 0), Point::new(100, 200)];
        let points = timeline(&path, Duration::from_millis(500), MOVE_STEP);

        assert_eq!(points.len(), 32);
        let (end, at) = *points.last().unwrap();
        assert_eq!(end, Point::new(100, 200));
        assert_eq!(at, Duration::from_millis(500));
    }

    #[test]
    fn test_timeline_halfway() {
        let path = [Point::new(0, 0), Point::new(100, 0)];
        let points = timeline(&path, Duration::from_millis(100), Duration::from_millis(50));

        assert_eq!(
            points,
            vec![
                (Point::new(50, 0), Duration::from_millis(50)),
                (Point::new(100, 0), Duration::from_millis(100)),
            ]
        );
    }

    #[test]
    fn test_timeline_multi_segment() {
        let path = [Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)];
        let points = timeline(&path, Duration::from_millis(40), Duration::from_millis(10));

        let positions: Vec<Point> = points.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            positions,
            vec![
                Point::new(5, 0),
                Point::new(10, 0),
                Point::new(10, 5),
                Point::new(10, 10),
            ]
        );
    }

    #[test]
    fn test_timeline_stationary_path() {
        let path = [Point::new(7, 7)];
        assert_eq!(
            timeline(&path, Duration::from_millis(100), MOVE_STEP),
            vec![(Point::new(7, 7), Duration::from_millis(100))]
        );
        assert!(timeline(&[], Duration::from_millis(100), MOVE_STEP).is_empty());
    }
}
