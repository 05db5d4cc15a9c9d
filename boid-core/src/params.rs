use thiserror::Error;

/// Lines past which boids start turning back toward the arena.
///
/// Screen coordinates: `y` grows downward, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    /// Margins for a `width` x `height` arena inset by `margin` on every side.
    pub fn inset(width: f32, height: f32, margin: f32) -> Self {
        Self {
            top: margin,
            bottom: height - margin,
            left: margin,
            right: width - margin,
        }
    }
}

/// Read-only simulation parameters shared by every update in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub centering_factor: f32,
    pub matching_factor: f32,
    pub avoidfactor: f32,
    pub turnfactor: f32,
    pub minspeed: f32,
    pub maxspeed: f32,
    pub bias_increment: f32,
    pub maxbias: f32,
    pub margins: Margins,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            centering_factor: 0.005,
            matching_factor: 0.05,
            avoidfactor: 0.05,
            turnfactor: 1.0,
            minspeed: 2.0,
            maxspeed: 4.0,
            bias_increment: 0.00004,
            maxbias: 0.01,
            margins: Margins::inset(800.0, 600.0, 50.0),
        }
    }
}

impl Params {
    /// Checks every invariant the update rule relies on.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let fields = [
            ("centering_factor", self.centering_factor),
            ("matching_factor", self.matching_factor),
            ("avoidfactor", self.avoidfactor),
            ("turnfactor", self.turnfactor),
            ("minspeed", self.minspeed),
            ("maxspeed", self.maxspeed),
            ("bias_increment", self.bias_increment),
            ("maxbias", self.maxbias),
            ("margins.top", self.margins.top),
            ("margins.bottom", self.margins.bottom),
            ("margins.left", self.margins.left),
            ("margins.right", self.margins.right),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ParamsError::NonFinite(name));
        }

        if self.minspeed < 0.0 || self.minspeed > self.maxspeed {
            return Err(ParamsError::SpeedRange {
                min: self.minspeed,
                max: self.maxspeed,
            });
        }
        if self.bias_increment <= 0.0 {
            return Err(ParamsError::BiasIncrement(self.bias_increment));
        }
        if self.bias_increment > self.maxbias {
            return Err(ParamsError::BiasRange {
                increment: self.bias_increment,
                max: self.maxbias,
            });
        }
        if self.margins.top >= self.margins.bottom || self.margins.left >= self.margins.right {
            return Err(ParamsError::Margins(self.margins));
        }
        Ok(())
    }

    /// Consumes the parameters, handing them back only if they validate.
    pub fn validated(self) -> Result<Self, ParamsError> {
        self.validate()?;
        Ok(self)
    }

    /// Clamps a bias value into `[bias_increment, maxbias]`.
    pub fn clamp_bias(&self, bias: f32) -> f32 {
        bias.max(self.bias_increment).min(self.maxbias)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamsError {
    #[error("parameter `{0}` is not finite")]
    NonFinite(&'static str),
    #[error("speed limits must satisfy 0 <= minspeed <= maxspeed (got {min}..{max})")]
    SpeedRange { min: f32, max: f32 },
    #[error("bias_increment must be positive (got {0})")]
    BiasIncrement(f32),
    #[error("bias_increment {increment} exceeds maxbias {max}")]
    BiasRange { increment: f32, max: f32 },
    #[error("margins must satisfy top < bottom and left < right (got {0:?})")]
    Margins(Margins),
}
