use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIs, EnumIter};
use thiserror::Error;

use crate::units::{BuildPoint, BuildRect, BuildSize};

static NEXT_PART_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a part instance
///
/// Two parts built from the same template are still different parts
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PartId(u64);

impl PartId {
    fn next() -> Self {
        Self(NEXT_PART_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for PartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartKind {
    Engine,
    Fuel,
    Structure,
    Decorative,
    Additional,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumIs)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FuelType {
    Liquid,
    Solid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineStats {
    pub thrust: f32,
    pub fuel_capacity: f32,
    pub fuel_type: FuelType,
    /// Fuel units burnt per second at full thrust
    pub fuel_consumption: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TankStats {
    pub fuel_capacity: f32,
    pub fuel_type: FuelType,
}

/// Role specific data of a part, tagged by [PartKind]
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum PartRole {
    Engine(EngineStats),
    Fuel(TankStats),
    Structure,
    Decorative,
    Additional,
}

impl PartRole {
    pub fn kind(&self) -> PartKind {
        match self {
            PartRole::Engine(_) => PartKind::Engine,
            PartRole::Fuel(_) => PartKind::Fuel,
            PartRole::Structure => PartKind::Structure,
            PartRole::Decorative => PartKind::Decorative,
            PartRole::Additional => PartKind::Additional,
        }
    }
}

/// Cardinal rotation of a part, in degrees
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotates by the given amount of degrees, which must be a multiple of 90
    pub fn rotated(self, by: i32) -> Result<Self, PartError> {
        if by % 90 != 0 {
            return Err(PartError::InvalidArgument(by));
        }
        let quarters = (self.quarters() + (by / 90).rem_euclid(4)) % 4;
        Ok(Self::ALL[quarters as usize])
    }

    /// Whether width and height trade places under this rotation
    pub fn is_sideways(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    fn quarters(self) -> i32 {
        self.degrees() as i32 / 90
    }
}

impl TryFrom<u16> for Rotation {
    type Error = PartError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Rotation::Deg0.rotated(value as i32)
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

/// Catalog entry describing a part that can be built
///
/// Role fields that don't apply to the [kind](PartTemplate::kind) are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTemplate {
    pub name: String,
    pub kind: PartKind,
    pub mass: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub thrust: f32,
    #[serde(default)]
    pub fuel_capacity: f32,
    #[serde(default)]
    pub fuel_type: Option<FuelType>,
    #[serde(default)]
    pub fuel_consumption: f32,
}

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum PartError {
    #[error("Part template `{name}` is invalid: {fault}")]
    #[diagnostic(code(model::part::invalid_template))]
    InvalidTemplate { name: String, fault: TemplateFault },
    #[error("Rotation must be a multiple of 90 degrees, got {0}")]
    #[diagnostic(code(model::part::invalid_argument))]
    InvalidArgument(i32),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateFault {
    #[error("`{field}` must be greater than zero, got {got}")]
    NotPositive { field: &'static str, got: f32 },
    #[error("`{field}` must not be negative, got {got}")]
    Negative { field: &'static str, got: f32 },
    #[error("`{field}` must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{kind} parts need a `fuel_type`")]
    MissingFuelType { kind: PartKind },
}

/// Single rocket component
///
/// Base dimensions never change after creation, only the rotation and the
/// position do
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PartRecord", into = "PartRecord")]
pub struct Part {
    id: PartId,
    name: String,
    mass: f32,
    base_size: BuildSize,
    role: PartRole,
    rotation: Rotation,
    position: BuildPoint,
}

impl Part {
    pub fn create(template: &PartTemplate) -> Result<Self, PartError> {
        let invalid = |fault| PartError::InvalidTemplate {
            name: template.name.clone(),
            fault,
        };
        let mass = positive("mass", template.mass).map_err(invalid)?;
        let width = positive("width", template.width).map_err(invalid)?;
        let height = positive("height", template.height).map_err(invalid)?;

        let fuel_type = || {
            template.fuel_type.ok_or(TemplateFault::MissingFuelType {
                kind: template.kind,
            })
        };
        let role = match template.kind {
            PartKind::Engine => PartRole::Engine(EngineStats {
                thrust: non_negative("thrust", template.thrust).map_err(invalid)?,
                fuel_capacity: non_negative("fuel_capacity", template.fuel_capacity)
                    .map_err(invalid)?,
                fuel_type: fuel_type().map_err(invalid)?,
                fuel_consumption: non_negative("fuel_consumption", template.fuel_consumption)
                    .map_err(invalid)?,
            }),
            PartKind::Fuel => PartRole::Fuel(TankStats {
                fuel_capacity: non_negative("fuel_capacity", template.fuel_capacity)
                    .map_err(invalid)?,
                fuel_type: fuel_type().map_err(invalid)?,
            }),
            PartKind::Structure => PartRole::Structure,
            PartKind::Decorative => PartRole::Decorative,
            PartKind::Additional => PartRole::Additional,
        };

        Ok(Self {
            id: PartId::next(),
            name: template.name.clone(),
            mass,
            base_size: BuildSize::new(width, height),
            role,
            rotation: Rotation::default(),
            position: BuildPoint::origin(),
        })
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PartKind {
        self.role.kind()
    }

    pub fn role(&self) -> &PartRole {
        &self.role
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn base_size(&self) -> BuildSize {
        self.base_size
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Top left corner in build area coordinates
    pub fn position(&self) -> BuildPoint {
        self.position
    }

    pub fn place(&mut self, position: BuildPoint) {
        self.position = position;
    }

    /// Rotates the part, `by` must be a multiple of 90. On error the rotation
    /// is left as is
    pub fn rotate(&mut self, by: i32) -> Result<(), PartError> {
        self.rotation = self.rotation.rotated(by)?;
        Ok(())
    }

    /// Size of the part with its rotation applied
    pub fn effective_bounds(&self) -> BuildSize {
        if self.rotation.is_sideways() {
            BuildSize::new(self.base_size.height, self.base_size.width)
        } else {
            self.base_size
        }
    }

    /// Area covered by the part at its current position
    pub fn bounds(&self) -> BuildRect {
        BuildRect::new(self.position, self.effective_bounds())
    }

    pub fn thrust(&self) -> f32 {
        match &self.role {
            PartRole::Engine(engine) => engine.thrust,
            _ => 0.0,
        }
    }

    pub fn fuel_capacity(&self) -> f32 {
        match &self.role {
            PartRole::Engine(engine) => engine.fuel_capacity,
            PartRole::Fuel(tank) => tank.fuel_capacity,
            _ => 0.0,
        }
    }

    pub fn fuel_consumption(&self) -> f32 {
        match &self.role {
            PartRole::Engine(engine) => engine.fuel_consumption,
            _ => 0.0,
        }
    }

    pub fn fuel_type(&self) -> Option<FuelType> {
        match &self.role {
            PartRole::Engine(engine) => Some(engine.fuel_type),
            PartRole::Fuel(tank) => Some(tank.fuel_type),
            _ => None,
        }
    }

    /// Human readable summary, one field per line
    pub fn describe(&self) -> String {
        let size = self.effective_bounds();
        match &self.role {
            PartRole::Engine(engine) => format!(
                "{}\nType: engine\nMass: {:.1}\nThrust: {:.0}\n\
                 Fuel: {:.0} ({})\nConsumption: {:.1}/s",
                self.name,
                self.mass,
                engine.thrust,
                engine.fuel_capacity,
                engine.fuel_type,
                engine.fuel_consumption
            ),
            PartRole::Fuel(tank) => format!(
                "{}\nType: fuel\nMass: {:.1}\nCapacity: {:.0} ({})",
                self.name, self.mass, tank.fuel_capacity, tank.fuel_type
            ),
            PartRole::Structure | PartRole::Decorative | PartRole::Additional => format!(
                "{}\nType: {}\nMass: {:.1}\nSize: {:.0}x{:.0}",
                self.name,
                self.kind(),
                self.mass,
                size.width,
                size.height
            ),
        }
    }

    /// Template this part would be recreated from
    pub fn template(&self) -> PartTemplate {
        PartTemplate {
            name: self.name.clone(),
            kind: self.kind(),
            mass: self.mass,
            width: self.base_size.width,
            height: self.base_size.height,
            thrust: self.thrust(),
            fuel_capacity: self.fuel_capacity(),
            fuel_type: self.fuel_type(),
            fuel_consumption: self.fuel_consumption(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, TemplateFault> {
    if !value.is_finite() {
        return Err(TemplateFault::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(TemplateFault::NotPositive { field, got: value });
    }
    Ok(value)
}

fn non_negative(field: &'static str, value: f32) -> Result<f32, TemplateFault> {
    if !value.is_finite() {
        return Err(TemplateFault::NotFinite { field });
    }
    if value < 0.0 {
        return Err(TemplateFault::Negative { field, got: value });
    }
    Ok(value)
}

/// Serialized form of a placed [Part]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRecord {
    #[serde(flatten)]
    pub template: PartTemplate,
    #[serde(default)]
    pub rotation: Rotation,
    pub x: f32,
    pub y: f32,
}

impl From<Part> for PartRecord {
    fn from(part: Part) -> Self {
        PartRecord {
            template: part.template(),
            rotation: part.rotation,
            x: part.position.x,
            y: part.position.y,
        }
    }
}

impl TryFrom<PartRecord> for Part {
    type Error = PartError;

    fn try_from(record: PartRecord) -> Result<Self, Self::Error> {
        let mut part = Part::create(&record.template)?;
        part.rotation = record.rotation;
        part.position = BuildPoint::new(record.x, record.y);
        Ok(part)
    }
}
