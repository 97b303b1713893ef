//! Preprocess, postprocess, and blend policy selectors.
//!
//! The numeric values are part of the configuration surface and must stay
//! stable: they are what callers put in config files and request payloads.
//!
//! | Preprocess        | Postprocess        | Blend          |
//! |-------------------|--------------------|----------------|
//! | `NONE = 1`        | `NONE = 1`         | `NONE = 1`     |
//! | `RESIZE = 2`      | `DIRECT_REPLACE = 2` | `POISSON = 2` |
//! | `CROP_AND_RESIZE = 3` | `BLEND = 3`    | `GAUSSIAN = 3` |
//! |                   |                    | `LINEAR = 4`   |
//! |                   |                    | `SMOOTH = 5`   |
//! |                   |                    | `SMOOTHER = 6` |
//!
//! Every selector serializes as its integer value and also parses from a
//! snake_case name:
//!
//! ```
//! use region_blend::{BlendType, PreprocessType};
//!
//! assert_eq!(PreprocessType::try_from(3).unwrap(), PreprocessType::CropAndResize);
//! assert_eq!("poisson".parse::<BlendType>().unwrap(), BlendType::Poisson);
//! assert_eq!(u8::from(BlendType::Smoother), 6);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error for unrecognized or inconsistent policy selections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Integer value outside the stable range of a selector.
    #[error("unknown {kind} value {value}")]
    UnknownValue { kind: &'static str, value: u8 },

    /// Name that does not match any selector variant.
    #[error("unknown {kind} name {name:?}")]
    UnknownName { kind: &'static str, name: String },

    /// `BLEND` postprocess without a blend variant.
    #[error("blend postprocess requires a blend type other than none")]
    MissingBlendType,

    /// Raw output requested for a patch that does not cover the whole image.
    #[error(
        "postprocess none is only valid when the region covers the whole image (preprocess {0})"
    )]
    PartialCoverage(PreprocessType),

    /// Target width or height of zero.
    #[error("target dimensions must be non-zero, got {width}x{height}")]
    ZeroTarget { width: u32, height: u32 },

    /// Blend option outside its valid range.
    #[error("invalid blend option: {0}")]
    InvalidOption(String),
}

macro_rules! policy_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            /// All variants in wire-value order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Stable snake_case name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = PolicyError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(PolicyError::UnknownValue { kind: $kind, value }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl FromStr for $name {
            type Err = PolicyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
                match normalized.as_str() {
                    $($label => Ok($name::$variant),)+
                    _ => Err(PolicyError::UnknownName {
                        kind: $kind,
                        name: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

policy_enum! {
    /// How the model input is derived from the image and mask.
    PreprocessType, "preprocess" {
        /// Resize the whole image and mask to the target size.
        None = 1 => "none",
        /// Same geometry as `None`; the patch is treated as a resized
        /// copy of the whole image when compositing.
        Resize = 2 => "resize",
        /// Crop an aspect-adjusted box around the mask, then resize.
        CropAndResize = 3 => "crop_and_resize",
    }
}

policy_enum! {
    /// How the model output is recombined with the original image.
    PostprocessType, "postprocess" {
        /// Raw model output at full resolution.
        None = 1 => "none",
        /// Hard cut at the mask boundary.
        DirectReplace = 2 => "direct_replace",
        /// Weighted combination selected by [`BlendType`].
        Blend = 3 => "blend",
    }
}

policy_enum! {
    /// Blending variant used by [`PostprocessType::Blend`].
    BlendType, "blend" {
        /// No blending.
        None = 1 => "none",
        /// Seamless cloning by solving a Poisson equation over the mask.
        Poisson = 2 => "poisson",
        /// Mask feathered with a Gaussian kernel.
        Gaussian = 3 => "gaussian",
        /// Mask value used directly as the blend weight.
        Linear = 4 => "linear",
        /// Mask feathered with a 3x3 smoothing kernel.
        Smooth = 5 => "smooth",
        /// Mask feathered with a wider 5x5 smoothing kernel.
        Smoother = 6 => "smoother",
    }
}

impl PreprocessType {
    /// Whether the prepared region spans the whole source image.
    pub fn covers_whole_image(self) -> bool {
        !matches!(self, PreprocessType::CropAndResize)
    }
}

impl Default for PreprocessType {
    fn default() -> Self {
        PreprocessType::CropAndResize
    }
}

impl Default for PostprocessType {
    fn default() -> Self {
        PostprocessType::Blend
    }
}

impl Default for BlendType {
    fn default() -> Self {
        BlendType::Gaussian
    }
}

/// Complete policy selection for one prepare/composite round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policies {
    #[serde(default)]
    pub preprocess: PreprocessType,
    #[serde(default)]
    pub postprocess: PostprocessType,
    #[serde(default)]
    pub blend: BlendType,
}

impl Policies {
    pub fn new(preprocess: PreprocessType, postprocess: PostprocessType, blend: BlendType) -> Self {
        Self {
            preprocess,
            postprocess,
            blend,
        }
    }

    /// Reject combinations that cannot produce a well-defined result.
    ///
    /// A blend variant paired with a non-blend postprocess is ignored rather
    /// than rejected.
    pub fn validate(&self) -> Result<(), PolicyError> {
        match self.postprocess {
            PostprocessType::Blend if self.blend == BlendType::None => {
                Err(PolicyError::MissingBlendType)
            }
            PostprocessType::None if !self.preprocess.covers_whole_image() => {
                Err(PolicyError::PartialCoverage(self.preprocess))
            }
            _ => Ok(()),
        }
    }
}
