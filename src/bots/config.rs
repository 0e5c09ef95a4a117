use std::time::Duration;

/// Тайминги бота: пауза «раздумий» перед ходом (случайная в границах)
/// и время показа реплики, если политика её вернула.
#[derive(Clone, Copy, Debug)]
pub struct BotConfig {
    pub think_delay_min: Duration,
    pub think_delay_max: Duration,
    pub comment_duration: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            think_delay_min: Duration::from_millis(400),
            think_delay_max: Duration::from_millis(1500),
            comment_duration: Duration::from_millis(900),
        }
    }
}

impl BotConfig {
    /// Конфиг без пауз – для тестов и headless-прогонов.
    pub fn instant() -> Self {
        Self {
            think_delay_min: Duration::ZERO,
            think_delay_max: Duration::ZERO,
            comment_duration: Duration::ZERO,
        }
    }

    /// Случайная пауза раздумий в заданных границах.
    pub fn think_delay(&self) -> Duration {
        if self.think_delay_max <= self.think_delay_min {
            return self.think_delay_min;
        }
        use rand::Rng;
        let min = self.think_delay_min.as_millis() as u64;
        let max = self.think_delay_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}
