use num_traits::{One, PrimInt};

/// Storage used for collision layer masks.
pub type LayerBits = u32;

/// Trait implemented by layer enums declared with [`define_layers!`](crate::define_layers).
///
/// The enum's discriminant (via `#[repr(u8)]`) is the bit index inside `Storage`.
pub trait LayerBit {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must stay below the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// Bitset over collision layers, used as the ray query filter.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask<T: PrimInt = LayerBits> {
    pub bits: T,
}

impl<T: PrimInt> LayerMask<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    pub fn from_layers<U: LayerBit<Storage = T> + Copy>(layers: &[U]) -> Self {
        let mut mask = Self::empty();
        mask.add_many(layers);
        mask
    }

    pub fn add<U: LayerBit<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits | layer.mask();
    }

    pub fn remove<U: LayerBit<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits & !layer.mask();
    }

    pub fn has<U: LayerBit<Storage = T>>(&self, layer: U) -> bool {
        (self.bits & layer.mask()) != T::zero()
    }

    pub fn add_many<U: LayerBit<Storage = T> + Copy>(&mut self, layers: &[U]) {
        for &layer in layers {
            self.add(layer);
        }
    }

    /// True if any layer is set in both masks.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a layer enum and implement [`LayerBit`] for it.
///
/// ```rust
/// kcc2d::define_layers!(HazardLayer, u32, {
///     Spikes,
///     Lava,
/// });
/// ```
#[macro_export]
macro_rules! define_layers {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::layers::LayerBit for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_layers!(Layer, LayerBits, {
    // Static level geometry: floors, walls, slopes, one-way ledges.
    Ground,
    // Moving platforms. Bodies collide with them like ground.
    Platform,
    // Kinematic bodies that platforms can carry or push.
    Passenger,
});

impl LayerMask {
    /// Mask used by walking bodies: everything solid they can stand on or bump into.
    pub fn obstacles() -> Self {
        Self::from_layers(&[Layer::Ground, Layer::Platform])
    }

    /// Mask used by platforms to find riders.
    pub fn passengers() -> Self {
        Self::from_layers(&[Layer::Passenger])
    }
}
