//! # tankhub-adapter-virtual
//!
//! Virtual/demo source that registers a set of example tanks and
//! optionally feeds them deterministic measurements, so the dashboard
//! shows moving data without any hardware.
//!
//! ## Provided tanks
//!
//! | Tank | Shape | Critical / Warning / Overflow |
//! |------|-------|-------------------------------|
//! | `water_tank_1` Concrete cistern | rectangular 2×5×2 | 8 / 25 / 80 |
//! | `water_tank_2` Steel tank | rectangular 2×3×1.5 | 5 / 30 / 85 |
//! | `water_tank_3` Black barrel | vertical cylinder ⌀2×2 | 5 / 30 / 85 |
//! | `water_tank_4` Mains reserve | elliptical 2×1.0/0.8 | 5 / 40 / 85 |
//!
//! ## Dependency rule
//!
//! Depends on `tankhub-app` (port traits) and `tankhub-domain` only.

use std::time::Duration;

use tokio::task::JoinHandle;

use tankhub_app::ports::{MeasurementSource, SourceContext};
use tankhub_domain::error::TankHubError;
use tankhub_domain::geometry::Geometry;
use tankhub_domain::tank::Tank;

/// Virtual source that registers demo tanks.
pub struct VirtualSource {
    interval: Duration,
    feed_measurements: bool,
    task: Option<JoinHandle<()>>,
}

impl VirtualSource {
    /// Create a new source. When `feed_measurements` is set, a background
    /// task applies a triangle-wave measurement to every demo tank each
    /// `interval`.
    #[must_use]
    pub fn new(interval: Duration, feed_measurements: bool) -> Self {
        Self {
            interval,
            feed_measurements,
            task: None,
        }
    }

    /// The demo tank definitions.
    fn demo_tanks() -> Vec<Tank> {
        let builders = [
            Tank::builder()
                .id("water_tank_1")
                .label("Concrete cistern")
                .geometry(Geometry::Rectangular {
                    width: 2.0,
                    length: 5.0,
                    height: 2.0,
                })
                .critical_level(8.0)
                .warning_level(25.0)
                .overflow_level(80.0),
            Tank::builder()
                .id("water_tank_2")
                .label("Steel tank")
                .geometry(Geometry::Rectangular {
                    width: 2.0,
                    length: 3.0,
                    height: 1.5,
                })
                .critical_level(5.0)
                .warning_level(30.0)
                .overflow_level(85.0),
            Tank::builder()
                .id("water_tank_3")
                .label("Black barrel")
                .geometry(Geometry::VerticalCylinder {
                    diameter: 2.0,
                    height: 2.0,
                })
                .critical_level(5.0)
                .warning_level(30.0)
                .overflow_level(85.0),
            Tank::builder()
                .id("water_tank_4")
                .label("Mains reserve")
                .geometry(Geometry::Elliptical {
                    length: 2.0,
                    horizontal_axis: 1.0,
                    vertical_axis: 0.8,
                })
                .critical_level(5.0)
                .warning_level(40.0)
                .overflow_level(85.0),
        ];
        builders
            .into_iter()
            .map(|builder| {
                builder
                    .sensor_topic("WATER_TANK_MEASUREMENT")
                    .build()
                    .expect("demo tank definitions are valid")
            })
            .collect()
    }
}

impl MeasurementSource for VirtualSource {
    fn name(&self) -> &'static str {
        "virtual"
    }

    async fn setup(&mut self, ctx: &impl SourceContext) -> Result<(), TankHubError> {
        for tank in Self::demo_tanks() {
            ctx.upsert_tank(tank).await?;
        }
        Ok(())
    }

    async fn start_background(
        &mut self,
        ctx: impl SourceContext + Clone + 'static,
    ) -> Result<(), TankHubError> {
        if !self.feed_measurements {
            return Ok(());
        }

        let interval = self.interval;
        let handle = tokio::spawn(async move {
            let tanks = Self::demo_tanks();
            let mut ticker = tokio::time::interval(interval);
            let mut tick: u32 = 0;
            loop {
                ticker.tick().await;
                for (index, tank) in tanks.iter().enumerate() {
                    // Stagger the tanks so they don't move in lockstep.
                    let offset = u32::try_from(index).unwrap_or(0) * 7;
                    let gap = triangle_wave(tick.wrapping_add(offset), 40) * tank.geometry.depth();
                    if let Err(err) = ctx.apply_measurement(&tank.id, gap).await {
                        tracing::warn!(tank_id = %tank.id, error = %err, "demo measurement rejected");
                    }
                }
                tick = tick.wrapping_add(1);
            }
        });
        self.task = Some(handle);
        Ok(())
    }

    async fn teardown(&mut self) -> Result<(), TankHubError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }
}

/// Periodic 0 → 1 → 0 ramp; deterministic so demo runs are reproducible.
fn triangle_wave(tick: u32, period: u32) -> f64 {
    let phase = tick % period;
    let half = period / 2;
    let position = if phase <= half { phase } else { period - phase };
    f64::from(position) / f64::from(half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tankhub_domain::id::TankId;
    use tankhub_domain::reading::TankReading;

    #[derive(Default, Clone)]
    struct RecordingContext {
        upserted: Arc<Mutex<Vec<Tank>>>,
    }

    impl SourceContext for RecordingContext {
        async fn upsert_tank(&self, tank: Tank) -> Result<Tank, TankHubError> {
            self.upserted.lock().unwrap().push(tank.clone());
            Ok(tank)
        }

        async fn apply_measurement(
            &self,
            id: &TankId,
            _value: f64,
        ) -> Result<TankReading, TankHubError> {
            Ok(TankReading::builder().id(id.clone()).label("Tank").build())
        }

        async fn snapshots(&self) -> Result<Vec<TankReading>, TankHubError> {
            Ok(vec![])
        }

        async fn sensor_topics(&self) -> Result<Vec<String>, TankHubError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn should_register_four_demo_tanks_on_setup() {
        let ctx = RecordingContext::default();
        let mut source = VirtualSource::new(Duration::from_secs(5), false);

        source.setup(&ctx).await.unwrap();

        let upserted = ctx.upserted.lock().unwrap();
        assert_eq!(upserted.len(), 4);
        assert_eq!(upserted[0].id.as_str(), "water_tank_1");
        assert_eq!(upserted[3].label, "Mains reserve");
    }

    #[tokio::test]
    async fn should_produce_valid_demo_tanks() {
        for tank in VirtualSource::demo_tanks() {
            tank.validate().unwrap();
        }
    }

    #[tokio::test]
    async fn should_not_spawn_task_when_feeding_disabled() {
        let ctx = RecordingContext::default();
        let mut source = VirtualSource::new(Duration::from_secs(5), false);

        source.start_background(ctx.clone()).await.unwrap();
        assert!(source.task.is_none());
    }

    #[tokio::test]
    async fn should_return_virtual_as_name() {
        let source = VirtualSource::new(Duration::from_secs(5), false);
        assert_eq!(source.name(), "virtual");
    }

    #[tokio::test]
    async fn should_teardown_without_background_task() {
        let mut source = VirtualSource::new(Duration::from_secs(5), false);
        assert!(source.teardown().await.is_ok());
    }

    #[test]
    fn should_ramp_triangle_wave_between_zero_and_one() {
        assert!((triangle_wave(0, 40) - 0.0).abs() < f64::EPSILON);
        assert!((triangle_wave(20, 40) - 1.0).abs() < f64::EPSILON);
        assert!((triangle_wave(40, 40) - 0.0).abs() < f64::EPSILON);
        for tick in 0..200 {
            let value = triangle_wave(tick, 40);
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
