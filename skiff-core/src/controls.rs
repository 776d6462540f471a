use serde::{Deserialize, Serialize};

/// Discrete steering read off the whistle pitch: one of the three commands,
/// or nothing when the band is quiet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteerIntent {
    Left,
    Forward,
    Right,
    Neutral,
}

impl SteerIntent {
    pub fn vector(self) -> ControlVector {
        ControlVector {
            left: matches!(self, SteerIntent::Left),
            forward: matches!(self, SteerIntent::Forward),
            right: matches!(self, SteerIntent::Right),
        }
    }
}

// ControlVector is what the simulation consumes each tick: three independent
// flags, deliberately not one-hot, because voice and keyboard combine
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlVector {
    pub left: bool,
    pub forward: bool,
    pub right: bool,
}

impl ControlVector {
    /// Per-flag OR; merging voice intent with keyboard state.
    pub fn or(self, other: ControlVector) -> ControlVector {
        ControlVector {
            left: self.left || other.left,
            forward: self.forward || other.forward,
            right: self.right || other.right,
        }
    }

    /// Pure forward input gives full thrust; turning alone still pushes the
    /// ship at half strength, and combined inputs add.
    pub fn thrust_factor(self) -> f64 {
        let mut factor = 0.0;
        if self.forward {
            factor += 1.0;
        }
        if self.left {
            factor += 0.5;
        }
        if self.right {
            factor += 0.5;
        }
        factor
    }

    /// +1 spins clockwise, -1 counter-clockwise; left and right cancel.
    pub fn steer(self) -> f64 {
        match (self.left, self.right) {
            (false, true) => 1.0,
            (true, false) => -1.0,
            _ => 0.0,
        }
    }
}

/// Current keyboard state of the three logical inputs, queryable at any
/// time. Implementations must not block; the latest key transition wins.
pub trait ControlSource {
    fn poll(&mut self) -> ControlVector;
}

/// A source with nothing pressed, for races without a keyboard.
pub struct NullControls;

impl ControlSource for NullControls {
    fn poll(&mut self) -> ControlVector {
        ControlVector::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlVector, SteerIntent};

    #[test]
    fn intents_map_to_one_hot_vectors() {
        assert!(SteerIntent::Left.vector().left);
        assert!(SteerIntent::Forward.vector().forward);
        assert!(SteerIntent::Right.vector().right);
        assert_eq!(SteerIntent::Neutral.vector(), ControlVector::default());
    }

    #[test]
    fn merge_is_per_flag_or() {
        let voice = SteerIntent::Left.vector();
        let keys = ControlVector {
            left: false,
            forward: true,
            right: false,
        };
        let merged = voice.or(keys);
        assert!(merged.left && merged.forward && !merged.right);
    }

    #[test]
    fn turning_gives_half_forward_thrust() {
        assert_eq!(SteerIntent::Forward.vector().thrust_factor(), 1.0);
        assert_eq!(SteerIntent::Left.vector().thrust_factor(), 0.5);
        let all = ControlVector {
            left: true,
            forward: true,
            right: true,
        };
        assert_eq!(all.thrust_factor(), 2.0);
    }

    #[test]
    fn opposing_turns_cancel() {
        let both = ControlVector {
            left: true,
            forward: false,
            right: true,
        };
        assert_eq!(both.steer(), 0.0);
        assert_eq!(SteerIntent::Right.vector().steer(), 1.0);
        assert_eq!(SteerIntent::Left.vector().steer(), -1.0);
    }
}
