//! Uniform description of the serializable payloads the engine moves between
//! prover and verifier.
//!
//! Every relation block describes its contribution to the four payload tapes
//! (supplement, claim secret, claim public, response) as a [`Layout`]; the
//! engine concatenates those layouts in block order and slices the matching
//! [`Payload`] back into per-block windows. An element on the wire is a
//! 4-byte big-endian length prefix followed by its canonical encoding, and
//! reading restores bit-exact state.

use crate::error::Error;
use blsful::inner_types::*;
use std::io::{Read, Write};

/// The kind of a single payload slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SlotKind {
    /// An element of the scalar field `Z`.
    Scalar,
    /// An element of the commitment group `G`.
    Point,
    /// An element of the pairing target group `T`.
    Target,
}

impl SlotKind {
    // Canonical encoded length.
    fn encoded_len(self) -> usize {
        match self {
            SlotKind::Scalar => 32,
            SlotKind::Point => 48,
            SlotKind::Target => Gt::BYTES,
        }
    }
}

/// An ordered description of a payload.
///
/// This is the flattened form of a descriptor tree: a single element, a
/// fixed-size array, a labeled composite, and the empty layout are all just
/// sequences of [`SlotKind`]s, concatenated in declaration order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Layout {
    kinds: Vec<SlotKind>,
}

impl Layout {
    /// The zero-sized layout.
    pub fn empty() -> Self {
        Layout { kinds: Vec::new() }
    }

    /// A single element of the given kind.
    pub fn element(kind: SlotKind) -> Self {
        Layout { kinds: vec![kind] }
    }

    /// `count` elements of a single kind.
    pub fn array(kind: SlotKind, count: usize) -> Self {
        Layout {
            kinds: vec![kind; count],
        }
    }

    /// The concatenation of the given parts, offsets accumulated in order.
    pub fn concat<I: IntoIterator<Item = Layout>>(parts: I) -> Self {
        let mut kinds = Vec::new();
        for part in parts {
            kinds.extend_from_slice(&part.kinds);
        }
        Layout { kinds }
    }

    /// The number of slots described.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the layout is zero-sized.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub(crate) fn kinds(&self) -> &[SlotKind] {
        &self.kinds
    }
}

/// One initialized value in a payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Slot {
    /// A scalar field element.
    Scalar(Scalar),
    /// A commitment group element.
    Point(G1Projective),
    /// A pairing target element.
    Target(Gt),
}

impl Slot {
    fn new(kind: SlotKind) -> Self {
        match kind {
            SlotKind::Scalar => Slot::Scalar(Scalar::ZERO),
            SlotKind::Point => Slot::Point(G1Projective::IDENTITY),
            SlotKind::Target => Slot::Target(Gt::IDENTITY),
        }
    }

    fn kind(&self) -> SlotKind {
        match self {
            Slot::Scalar(_) => SlotKind::Scalar,
            Slot::Point(_) => SlotKind::Point,
            Slot::Target(_) => SlotKind::Target,
        }
    }

    fn write<W: Write>(&self, stream: &mut W) -> Result<(), Error> {
        match self {
            Slot::Scalar(s) => write_framed(stream, &s.to_be_bytes()),
            Slot::Point(p) => write_framed(stream, &p.to_compressed()),
            Slot::Target(t) => write_framed(stream, t.to_bytes().as_ref()),
        }
    }

    fn read<R: Read>(kind: SlotKind, stream: &mut R) -> Result<Self, Error> {
        let bytes = read_framed(stream, kind.encoded_len())?;
        match kind {
            SlotKind::Scalar => Ok(Slot::Scalar(sc(&bytes)?)),
            SlotKind::Point => Ok(Slot::Point(g1(&bytes)?)),
            SlotKind::Target => Ok(Slot::Target(gt(&bytes)?)),
        }
    }
}

/// A payload tape: one value per slot of some [`Layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct Payload {
    slots: Vec<Slot>,
}

impl Payload {
    /// Allocate a payload with every slot set to its identity value.
    pub fn new(layout: &Layout) -> Self {
        Payload {
            slots: layout.kinds().iter().map(|&k| Slot::new(k)).collect(),
        }
    }

    /// The number of slots held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the payload holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    // Whether the slot kinds match `layout` exactly.
    pub(crate) fn matches(&self, layout: &Layout) -> bool {
        self.slots.len() == layout.len()
            && self
                .slots
                .iter()
                .zip(layout.kinds())
                .all(|(slot, &kind)| slot.kind() == kind)
    }

    /// Write every slot to a stream in declaration order.
    pub fn write<W: Write>(&self, stream: &mut W) -> Result<(), Error> {
        for slot in &self.slots {
            slot.write(stream)?;
        }
        Ok(())
    }

    /// Read a payload for `layout` from a stream.
    pub fn read<R: Read>(layout: &Layout, stream: &mut R) -> Result<Self, Error> {
        let mut slots = Vec::with_capacity(layout.len());
        for &kind in layout.kinds() {
            slots.push(Slot::read(kind, stream)?);
        }
        Ok(Payload { slots })
    }

    /// The serialized byte form of this payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)
            .expect("writing to a byte vector cannot fail");
        bytes
    }
}

pub(crate) fn write_framed<W: Write>(stream: &mut W, bytes: &[u8]) -> Result<(), Error> {
    stream.write_all(&(bytes.len() as u32).to_be_bytes())?;
    stream.write_all(bytes)?;
    Ok(())
}

pub(crate) fn read_framed<R: Read>(stream: &mut R, expected: usize) -> Result<Vec<u8>, Error> {
    let mut size = [0u8; 4];
    stream.read_exact(&mut size)?;
    if u32::from_be_bytes(size) as usize != expected {
        return Err(Error::InvalidElement("length prefix"));
    }
    let mut data = vec![0u8; expected];
    stream.read_exact(&mut data)?;
    Ok(data)
}

pub(crate) fn sc(b: &[u8]) -> Result<Scalar, Error> {
    let buf = <[u8; 32]>::try_from(b).map_err(|_| Error::InvalidElement("scalar"))?;
    Option::<Scalar>::from(Scalar::from_be_bytes(&buf)).ok_or(Error::InvalidElement("scalar"))
}

pub(crate) fn g1(b: &[u8]) -> Result<G1Projective, Error> {
    let buf = <[u8; 48]>::try_from(b).map_err(|_| Error::InvalidElement("point"))?;
    Option::<G1Projective>::from(G1Projective::from_compressed(&buf))
        .ok_or(Error::InvalidElement("point"))
}

pub(crate) fn gt(b: &[u8]) -> Result<Gt, Error> {
    let buf = <[u8; Gt::BYTES]>::try_from(b).map_err(|_| Error::InvalidElement("target"))?;
    let mut repr = <Gt as GroupEncoding>::Repr::default();
    repr.as_mut().copy_from_slice(&buf);
    Option::<Gt>::from(Gt::from_bytes(&repr)).ok_or(Error::InvalidElement("target"))
}

// Slice accessors used by blocks. Layouts are fixed by the block
// constructors, so a kind mismatch here is unreachable.

pub(crate) fn scalar_at(slots: &[Slot], index: usize) -> Scalar {
    match slots[index] {
        Slot::Scalar(s) => s,
        _ => unreachable!("payload slot is not a scalar"),
    }
}

pub(crate) fn point_at(slots: &[Slot], index: usize) -> G1Projective {
    match slots[index] {
        Slot::Point(p) => p,
        _ => unreachable!("payload slot is not a point"),
    }
}

pub(crate) fn target_at(slots: &[Slot], index: usize) -> Gt {
    match slots[index] {
        Slot::Target(t) => t,
        _ => unreachable!("payload slot is not a target element"),
    }
}

pub(crate) fn set_scalar(slots: &mut [Slot], index: usize, value: Scalar) {
    slots[index] = Slot::Scalar(value);
}

pub(crate) fn set_point(slots: &mut [Slot], index: usize, value: G1Projective) {
    slots[index] = Slot::Point(value);
}

pub(crate) fn set_target(slots: &mut [Slot], index: usize, value: Gt) {
    slots[index] = Slot::Target(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{pair, random_scalar};
    use std::io::Cursor;

    #[test]
    fn layout_concat_accumulates() {
        let layout = Layout::concat([
            Layout::element(SlotKind::Target),
            Layout::array(SlotKind::Point, 3),
            Layout::empty(),
            Layout::array(SlotKind::Scalar, 2),
        ]);
        assert_eq!(layout.len(), 6);
        assert_eq!(layout.kinds()[0], SlotKind::Target);
        assert_eq!(layout.kinds()[3], SlotKind::Point);
        assert_eq!(layout.kinds()[5], SlotKind::Scalar);
    }

    #[test]
    fn payload_roundtrip() {
        let layout = Layout::concat([
            Layout::element(SlotKind::Scalar),
            Layout::element(SlotKind::Point),
            Layout::element(SlotKind::Target),
        ]);
        let mut payload = Payload::new(&layout);
        let s = random_scalar();
        set_scalar(payload.slots_mut(), 0, s);
        set_point(payload.slots_mut(), 1, G1Projective::GENERATOR * s);
        set_target(
            payload.slots_mut(),
            2,
            pair(G1Projective::GENERATOR, G2Projective::GENERATOR) * s,
        );

        let bytes = payload.to_bytes();
        let restored = Payload::read(&layout, &mut Cursor::new(&bytes)).unwrap();
        assert_eq!(payload, restored);
        assert!(restored.matches(&layout));
    }

    #[test]
    fn read_rejects_bad_length_prefix() {
        let layout = Layout::element(SlotKind::Scalar);
        let mut bytes = Payload::new(&layout).to_bytes();
        // Corrupt the length prefix.
        bytes[3] = 47;
        assert!(Payload::read(&layout, &mut Cursor::new(&bytes)).is_err());
    }

    #[test]
    fn read_rejects_short_stream() {
        let layout = Layout::array(SlotKind::Point, 2);
        let mut bytes = Payload::new(&layout).to_bytes();
        bytes.truncate(bytes.len() - 10);
        assert!(Payload::read(&layout, &mut Cursor::new(&bytes)).is_err());
    }
}
