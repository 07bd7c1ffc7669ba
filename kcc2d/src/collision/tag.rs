/// Packed collision metadata stored in a collider's `user_data`.
///
/// # Why this exists
/// Rapier gives every collider a single `u128` of user data. The ray query needs three
/// facts about whatever it hits (layers, surface kind, owning body) without a side table,
/// so they are packed into that one value.
///
/// # Bit layout
/// Least-significant bit = bit 0:
///
/// - bits 0..=31   : layer bits (`LayerBits`)
/// - bits 32..=39  : `SurfaceKind` tag (u8)
/// - bits 40..=71  : owning `BodyId` (u32), meaningful only if bit 72 is set
/// - bit 72        : "has body" marker
/// - bits 73..=127 : reserved (must be zero)
///
/// # Compatibility
/// Treat the layout as a storage format: colliders built with one layout must not be read
/// back with another.
pub type ColliderTag = u128;

use crate::{
    collision::types::{BodyId, SurfaceKind},
    layers::{LayerBits, LayerMask},
};

const SURFACE_SHIFT: u32 = LayerBits::BITS;
const BODY_SHIFT: u32 = SURFACE_SHIFT + u8::BITS;
const HAS_BODY_BIT: u32 = BODY_SHIFT + u32::BITS;

/// Packs layers, surface kind and optional owner into a [`ColliderTag`].
pub fn pack_tag(layers: LayerMask, surface: SurfaceKind, body: Option<BodyId>) -> ColliderTag {
    let mut tag = layers.bits as u128 | ((surface as u128) << SURFACE_SHIFT);
    if let Some(BodyId(id)) = body {
        tag |= ((id as u128) << BODY_SHIFT) | (1u128 << HAS_BODY_BIT);
    }
    tag
}

/// Extracts the layer bits of a tag.
pub fn unpack_layers(tag: ColliderTag) -> LayerMask {
    LayerMask::new((tag & LayerBits::MAX as u128) as LayerBits)
}

/// Extracts the surface kind of a tag.
///
/// Unknown surface tags read as [`SurfaceKind::Solid`]: a collider that blocks when it
/// should not is recoverable, one that lets bodies fall through the level is not.
pub fn unpack_surface(tag: ColliderTag) -> SurfaceKind {
    match try_unpack_surface(tag) {
        Some(surface) => surface,
        None => {
            log::warn!("Collider tag {tag:#x} has unknown surface kind; treating as solid");
            SurfaceKind::Solid
        }
    }
}

/// Safely extracts the surface kind, returning `None` for unknown tags.
pub fn try_unpack_surface(tag: ColliderTag) -> Option<SurfaceKind> {
    match ((tag >> SURFACE_SHIFT) & u8::MAX as u128) as u8 {
        0 => Some(SurfaceKind::Solid),
        1 => Some(SurfaceKind::OneWay),
        _ => None,
    }
}

/// Extracts the owning body of a tag, if any.
pub fn unpack_body(tag: ColliderTag) -> Option<BodyId> {
    if (tag >> HAS_BODY_BIT) & 1 == 0 {
        return None;
    }
    Some(BodyId(((tag >> BODY_SHIFT) & u32::MAX as u128) as u32))
}

/// Validates that a tag conforms to the current packing contract.
pub fn validate_tag(tag: ColliderTag) -> Result<(), &'static str> {
    const RESERVED_MASK: u128 = !0u128 << (HAS_BODY_BIT + 1);
    if (tag & RESERVED_MASK) != 0 {
        return Err("Collider tag reserved bits are non-zero");
    }
    if try_unpack_surface(tag).is_none() {
        return Err("Collider tag has unknown surface kind");
    }
    Ok(())
}
