//! OSM road attributes and deduplicated attribute sets.
//!
//! Edges do not embed their attributes: each edge record carries a 16-bit
//! index into a shared table of [`AttributeSet`] values, one per distinct
//! attribute combination present in the network.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bytes per stored attribute-set record.
pub const ATTRIBUTE_SET_BYTES: usize = 8;

/// One OSM `key=value` road attribute relevant to bicycle routing.
///
/// The discriminant is the attribute's bit index in an [`AttributeSet`];
/// the declaration order is part of the binary format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Attribute {
    // highway=*
    HighwayService,
    HighwayTrack,
    HighwayResidential,
    HighwayFootway,
    HighwayPath,
    HighwayUnclassified,
    HighwayTertiary,
    HighwaySecondary,
    HighwaySteps,
    HighwayPrimary,
    HighwayCycleway,
    HighwayMotorway,
    HighwayPedestrian,
    HighwayTrunk,
    HighwayLivingStreet,
    HighwayRoad,
    // tracktype=*
    TracktypeGrade1,
    TracktypeGrade2,
    TracktypeGrade3,
    TracktypeGrade4,
    TracktypeGrade5,
    // surface=*
    SurfaceAsphalt,
    SurfaceUnpaved,
    SurfaceGravel,
    SurfacePaved,
    SurfaceGround,
    SurfaceConcrete,
    SurfaceCompacted,
    SurfacePavingStones,
    SurfaceGrass,
    SurfaceDirt,
    SurfaceFineGravel,
    SurfacePebblestone,
    SurfaceSett,
    SurfaceWood,
    SurfaceSand,
    SurfaceCobblestone,
    // oneway=*
    OnewayYes,
    OnewayMinus1,
    OnewayBicycleYes,
    OnewayBicycleNo,
    // access restrictions
    MotorroadYes,
    VehicleNo,
    VehiclePrivate,
    AccessYes,
    AccessNo,
    AccessPrivate,
    AccessPermissive,
    BicycleYes,
    BicycleNo,
    BicycleDesignated,
    BicycleDismount,
    BicycleUseSidepath,
    BicyclePermissive,
    BicyclePrivate,
    CyclewayOpposite,
    CyclewayOppositeLane,
    CyclewayOppositeTrack,
    // cycle route network memberships
    LcnYes,
    IcnYes,
    NcnYes,
    RcnYes,
}

impl Attribute {
    /// Number of attributes, and the number of significant bits in an
    /// [`AttributeSet`].
    pub const COUNT: usize = 62;

    /// Every attribute, in bit-index order.
    pub const ALL: [Attribute; Self::COUNT] = [
        Attribute::HighwayService,
        Attribute::HighwayTrack,
        Attribute::HighwayResidential,
        Attribute::HighwayFootway,
        Attribute::HighwayPath,
        Attribute::HighwayUnclassified,
        Attribute::HighwayTertiary,
        Attribute::HighwaySecondary,
        Attribute::HighwaySteps,
        Attribute::HighwayPrimary,
        Attribute::HighwayCycleway,
        Attribute::HighwayMotorway,
        Attribute::HighwayPedestrian,
        Attribute::HighwayTrunk,
        Attribute::HighwayLivingStreet,
        Attribute::HighwayRoad,
        Attribute::TracktypeGrade1,
        Attribute::TracktypeGrade2,
        Attribute::TracktypeGrade3,
        Attribute::TracktypeGrade4,
        Attribute::TracktypeGrade5,
        Attribute::SurfaceAsphalt,
        Attribute::SurfaceUnpaved,
        Attribute::SurfaceGravel,
        Attribute::SurfacePaved,
        Attribute::SurfaceGround,
        Attribute::SurfaceConcrete,
        Attribute::SurfaceCompacted,
        Attribute::SurfacePavingStones,
        Attribute::SurfaceGrass,
        Attribute::SurfaceDirt,
        Attribute::SurfaceFineGravel,
        Attribute::SurfacePebblestone,
        Attribute::SurfaceSett,
        Attribute::SurfaceWood,
        Attribute::SurfaceSand,
        Attribute::SurfaceCobblestone,
        Attribute::OnewayYes,
        Attribute::OnewayMinus1,
        Attribute::OnewayBicycleYes,
        Attribute::OnewayBicycleNo,
        Attribute::MotorroadYes,
        Attribute::VehicleNo,
        Attribute::VehiclePrivate,
        Attribute::AccessYes,
        Attribute::AccessNo,
        Attribute::AccessPrivate,
        Attribute::AccessPermissive,
        Attribute::BicycleYes,
        Attribute::BicycleNo,
        Attribute::BicycleDesignated,
        Attribute::BicycleDismount,
        Attribute::BicycleUseSidepath,
        Attribute::BicyclePermissive,
        Attribute::BicyclePrivate,
        Attribute::CyclewayOpposite,
        Attribute::CyclewayOppositeLane,
        Attribute::CyclewayOppositeTrack,
        Attribute::LcnYes,
        Attribute::IcnYes,
        Attribute::NcnYes,
        Attribute::RcnYes,
    ];

    /// Bit index of the attribute in an [`AttributeSet`].
    pub fn bit(self) -> u32 {
        self as u32
    }

    /// The OSM key and value of the attribute.
    pub fn key_value(self) -> (&'static str, &'static str) {
        use Attribute::*;
        match self {
            HighwayService => ("highway", "service"),
            HighwayTrack => ("highway", "track"),
            HighwayResidential => ("highway", "residential"),
            HighwayFootway => ("highway", "footway"),
            HighwayPath => ("highway", "path"),
            HighwayUnclassified => ("highway", "unclassified"),
            HighwayTertiary => ("highway", "tertiary"),
            HighwaySecondary => ("highway", "secondary"),
            HighwaySteps => ("highway", "steps"),
            HighwayPrimary => ("highway", "primary"),
            HighwayCycleway => ("highway", "cycleway"),
            HighwayMotorway => ("highway", "motorway"),
            HighwayPedestrian => ("highway", "pedestrian"),
            HighwayTrunk => ("highway", "trunk"),
            HighwayLivingStreet => ("highway", "living_street"),
            HighwayRoad => ("highway", "road"),
            TracktypeGrade1 => ("tracktype", "grade1"),
            TracktypeGrade2 => ("tracktype", "grade2"),
            TracktypeGrade3 => ("tracktype", "grade3"),
            TracktypeGrade4 => ("tracktype", "grade4"),
            TracktypeGrade5 => ("tracktype", "grade5"),
            SurfaceAsphalt => ("surface", "asphalt"),
            SurfaceUnpaved => ("surface", "unpaved"),
            SurfaceGravel => ("surface", "gravel"),
            SurfacePaved => ("surface", "paved"),
            SurfaceGround => ("surface", "ground"),
            SurfaceConcrete => ("surface", "concrete"),
            SurfaceCompacted => ("surface", "compacted"),
            SurfacePavingStones => ("surface", "paving_stones"),
            SurfaceGrass => ("surface", "grass"),
            SurfaceDirt => ("surface", "dirt"),
            SurfaceFineGravel => ("surface", "fine_gravel"),
            SurfacePebblestone => ("surface", "pebblestone"),
            SurfaceSett => ("surface", "sett"),
            SurfaceWood => ("surface", "wood"),
            SurfaceSand => ("surface", "sand"),
            SurfaceCobblestone => ("surface", "cobblestone"),
            OnewayYes => ("oneway", "yes"),
            OnewayMinus1 => ("oneway", "-1"),
            OnewayBicycleYes => ("oneway:bicycle", "yes"),
            OnewayBicycleNo => ("oneway:bicycle", "no"),
            MotorroadYes => ("motorroad", "yes"),
            VehicleNo => ("vehicle", "no"),
            VehiclePrivate => ("vehicle", "private"),
            AccessYes => ("access", "yes"),
            AccessNo => ("access", "no"),
            AccessPrivate => ("access", "private"),
            AccessPermissive => ("access", "permissive"),
            BicycleYes => ("bicycle", "yes"),
            BicycleNo => ("bicycle", "no"),
            BicycleDesignated => ("bicycle", "designated"),
            BicycleDismount => ("bicycle", "dismount"),
            BicycleUseSidepath => ("bicycle", "use_sidepath"),
            BicyclePermissive => ("bicycle", "permissive"),
            BicyclePrivate => ("bicycle", "private"),
            CyclewayOpposite => ("cycleway", "opposite"),
            CyclewayOppositeLane => ("cycleway", "opposite_lane"),
            CyclewayOppositeTrack => ("cycleway", "opposite_track"),
            LcnYes => ("lcn", "yes"),
            IcnYes => ("icn", "yes"),
            NcnYes => ("ncn", "yes"),
            RcnYes => ("rcn", "yes"),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, value) = self.key_value();
        write!(f, "{key}={value}")
    }
}

/// An immutable set of [`Attribute`]s, one bit per attribute.
///
/// Only the low [`Attribute::COUNT`] bits are significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    bits: u64,
}

impl AttributeSet {
    /// Mask of the bits that correspond to an attribute.
    pub const VALID_MASK: u64 = (1u64 << Attribute::COUNT) - 1;

    /// The empty set.
    pub const EMPTY: AttributeSet = AttributeSet { bits: 0 };

    /// Set with exactly the given raw bits.
    ///
    /// # Panics
    ///
    /// Panics if a bit above the valid mask is set.
    pub fn new(bits: u64) -> Self {
        assert_eq!(
            bits & !Self::VALID_MASK,
            0,
            "attribute bits above the valid mask: {bits:#x}"
        );
        Self { bits }
    }

    /// Set containing exactly the given attributes.
    pub fn of(attributes: &[Attribute]) -> Self {
        let bits = attributes
            .iter()
            .fold(0u64, |bits, attribute| bits | 1 << attribute.bit());
        Self { bits }
    }

    pub fn bits(self) -> u64 {
        self.bits
    }

    /// Whether the set contains `attribute`.
    pub fn contains(self, attribute: Attribute) -> bool {
        self.bits & (1 << attribute.bit()) != 0
    }

    /// Whether the two sets share at least one attribute.
    pub fn intersects(self, that: AttributeSet) -> bool {
        self.bits & that.bits != 0
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for attribute in Attribute::ALL {
            if self.contains(attribute) {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "{attribute}")?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}
