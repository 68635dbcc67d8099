use crate::config::AnimatedLayer;
use crate::layer::TileLayer;
use log::debug;
use std::time::Duration;

/// Blinks one layer on and off at a fixed interval.
///
/// Elapsed time is accumulated across ticks. Every full `interval` flips the
/// selected layer once and is subtracted, so the remainder carries into the
/// next period. A long frame therefore produces one flip per interval it
/// spans, keeping the blink in phase with wall-clock time.
#[derive(Debug, Clone)]
pub struct LayerAnimator {
    target: AnimatedLayer,
    interval: Duration,
    elapsed: Duration,
}

impl LayerAnimator {
    /// Starts with nothing accumulated.
    pub fn new(target: AnimatedLayer, interval: Duration) -> Self {
        Self {
            target,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances by `dt`. Returns how many times the layer was toggled.
    pub fn tick(&mut self, dt: Duration, layers: &mut [TileLayer]) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.elapsed += dt;

        let target = self.target.resolve(layers.len());
        let mut toggles = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            if let Some(layer) = target.and_then(|i| layers.get_mut(i)) {
                layer.toggle();
                toggles += 1;
                debug!("layer '{}' visible={}", layer.name, layer.visible);
            }
        }
        toggles
    }

    /// Time accumulated since the last toggle.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Layer selector this animator toggles
    pub fn target(&self) -> AnimatedLayer {
        self.target
    }

    /// Time between toggles
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::TileGeometry;
    use macroquad::prelude::*;

    fn layers(n: usize) -> Vec<TileLayer> {
        (0..n)
            .map(|i| TileLayer {
                name: format!("l{i}"),
                geometry: TileGeometry::build(&[1], 1, 1, 1, vec2(16.0, 16.0)),
                visible: true,
            })
            .collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn flips_last_layer_once_per_second() {
        let mut ls = layers(3);
        let mut anim = LayerAnimator::new(AnimatedLayer::Last, ms(1000));

        assert_eq!(anim.tick(ms(400), &mut ls), 0);
        assert_eq!(anim.tick(ms(400), &mut ls), 0);
        assert_eq!(anim.tick(ms(200), &mut ls), 1);
        assert!(!ls[2].visible);
        assert!(ls[0].visible && ls[1].visible);
        assert_eq!(anim.elapsed(), Duration::ZERO);

        for _ in 0..4 {
            anim.tick(ms(250), &mut ls);
        }
        assert!(ls[2].visible);
    }

    #[test]
    fn keeps_remainder_after_toggle() {
        let mut ls = layers(1);
        let mut anim = LayerAnimator::new(AnimatedLayer::Last, ms(1000));

        anim.tick(ms(1300), &mut ls);
        assert_eq!(anim.elapsed(), ms(300));
        assert_eq!(anim.tick(ms(700), &mut ls), 1);
        assert!(ls[0].visible);
    }

    #[test]
    fn long_frame_toggles_once_per_interval() {
        let mut ls = layers(1);
        let mut anim = LayerAnimator::new(AnimatedLayer::Last, ms(1000));

        assert_eq!(anim.tick(ms(3500), &mut ls), 3);
        assert!(!ls[0].visible);
        assert_eq!(anim.elapsed(), ms(500));
    }

    #[test]
    fn explicit_index_selects_layer() {
        let mut ls = layers(3);
        let mut anim = LayerAnimator::new(AnimatedLayer::Index(0), ms(1000));
        anim.tick(ms(1000), &mut ls);
        assert!(!ls[0].visible);
        assert!(ls[2].visible);
    }

    #[test]
    fn unresolved_target_consumes_time_without_toggling() {
        let mut ls = layers(2);
        let mut anim = LayerAnimator::new(AnimatedLayer::Index(7), ms(1000));
        assert_eq!(anim.tick(ms(1500), &mut ls), 0);
        assert_eq!(anim.elapsed(), ms(500));

        let mut none: Vec<TileLayer> = Vec::new();
        let mut anim = LayerAnimator::new(AnimatedLayer::Last, ms(1000));
        assert_eq!(anim.tick(ms(1000), &mut none), 0);
    }

    #[test]
    fn zero_interval_disables_animation() {
        let mut ls = layers(1);
        let mut anim = LayerAnimator::new(AnimatedLayer::Last, Duration::ZERO);
        assert_eq!(anim.tick(ms(5000), &mut ls), 0);
        assert!(ls[0].visible);
    }
}
