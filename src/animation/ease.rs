use std::f64::consts::PI;

/// Angular rate of the critically-damped spring curve; at `t = 1` it is within 1e-4 of rest.
const SPRING_OMEGA: f64 = 12.0;

/// Easing functions used to map normalized animation progress.
///
/// Referenced by name from scripts and [`crate::Animation::set_easing`]; see [`Ease::from_name`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// Quadratic slow start.
    EaseIn,
    /// Quadratic slow end.
    EaseOut,
    /// Piecewise quadratic, symmetric about `t = 0.5`.
    EaseInOut,
    /// Exponentially decaying oscillation that settles on 1.
    Elastic,
    /// Four-segment parabolic bounce.
    Bounce,
    /// Critically damped spring response.
    Spring,
}

impl Ease {
    /// Every easing, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::Elastic,
        Self::Bounce,
        Self::Spring,
    ];

    /// Resolve an easing by name.
    ///
    /// Accepts the canonical camelCase names (`easeInOut`) as well as snake/kebab case and any
    /// letter case. Unknown names resolve to [`Ease::Linear`]; easing never fails.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "linear" => Self::Linear,
            "easein" => Self::EaseIn,
            "easeout" => Self::EaseOut,
            "easeinout" => Self::EaseInOut,
            "elastic" => Self::Elastic,
            "bounce" => Self::Bounce,
            "spring" => Self::Spring,
            _ => {
                tracing::debug!(name, "unknown easing name, falling back to linear");
                Self::Linear
            }
        }
    }

    /// Canonical name, as accepted by [`Ease::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
            Self::Elastic => "elastic",
            Self::Bounce => "bounce",
            Self::Spring => "spring",
        }
    }

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::Elastic => elastic(t),
            Self::Bounce => bounce(t),
            Self::Spring => spring(t),
        }
    }
}

fn elastic(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c4 = (2.0 * PI) / 3.0;
    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

fn bounce(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let n1 = 7.5625;
    let d1 = 2.75;
    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

fn spring(t: f64) -> f64 {
    if t >= 1.0 {
        return 1.0;
    }
    let wt = SPRING_OMEGA * t;
    (1.0 - (1.0 + wt) * (-wt).exp()).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
