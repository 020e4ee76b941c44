//! User-supplied planning parameters and profile unit policies.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::request::{Costs, ProfileDescriptor, Quantity};

/// Accepted range for the fixed cost input.
pub const FIXED_COST_RANGE: RangeInclusive<f64> = 0.0..=10.0;
/// Accepted range for the per-kilometre distance cost input.
pub const DISTANCE_COST_RANGE: RangeInclusive<f64> = 0.0..=10.0;
/// Accepted range for the per-hour time cost input.
pub const TIME_COST_RANGE: RangeInclusive<f64> = 0.0..=20.0;
/// Largest capacity or vehicle count accepted.
pub const MAX_FLEET_PARAMETER: f64 = 1.0e9;
/// Latest hour a shift may start or end at.
pub const MAX_SHIFT_HOUR: u8 = 23;

/// Vehicle profile offered by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Light van (`sprinter`), costs normalised to per-metre and per-second.
    #[default]
    Car,
    /// Heavy goods vehicle (`scania`), costs passed through unconverted.
    Truck,
}

impl Profile {
    /// Lower-case profile type sent as the descriptor `type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Truck => "truck",
        }
    }

    /// Routing-service profile name referenced by the vehicle type.
    #[must_use]
    pub const fn profile_name(self) -> &'static str {
        match self {
            Self::Car => "sprinter",
            Self::Truck => "scania",
        }
    }

    /// Vehicle type identifier used in the request.
    #[must_use]
    pub const fn vehicle_id(self) -> &'static str {
        match self {
            Self::Car => "vehicle_1",
            Self::Truck => "truck1",
        }
    }

    /// Unit handling applied to cost and capacity inputs.
    #[must_use]
    pub const fn unit_policy(self) -> UnitPolicy {
        match self {
            Self::Car => UnitPolicy::CAR,
            Self::Truck => UnitPolicy::TRUCK,
        }
    }

    /// Descriptor entry for `fleet.profiles`.
    #[must_use]
    pub fn descriptor(self) -> ProfileDescriptor {
        ProfileDescriptor {
            kind: self.as_str().to_owned(),
            name: self.profile_name().to_owned(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown profile name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle profile {0:?} (expected \"car\" or \"truck\")")]
pub struct UnknownProfile(pub String);

impl FromStr for Profile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(Self::Car),
            "truck" => Ok(Self::Truck),
            _ => Err(UnknownProfile(s.to_owned())),
        }
    }
}

/// How capacity and vehicle count inputs become request quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityCoercion {
    /// Drop any fractional part.
    Truncate,
    /// Forward the supplied number unchanged.
    Verbatim,
}

impl CapacityCoercion {
    /// Apply the coercion to a raw input value.
    #[must_use]
    pub fn apply(self, value: f64) -> Quantity {
        match self {
            Self::Truncate => Quantity::from_f64(value.trunc()),
            Self::Verbatim => Quantity::from_f64(value),
        }
    }
}

/// Profile-specific unit conversion applied by the vehicle builder.
///
/// Cost inputs are entered per kilometre and per hour. The car policy divides
/// them down to per-metre and per-second; the truck policy keeps the raw
/// slider units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPolicy {
    /// Divisor applied to the distance cost input.
    pub distance_divisor: f64,
    /// Divisor applied to the time cost input.
    pub time_divisor: f64,
    /// Coercion applied to capacity and vehicle count.
    pub capacity: CapacityCoercion,
}

impl UnitPolicy {
    /// Per-metre and per-second costs with integer quantities.
    pub const CAR: Self = Self {
        distance_divisor: 1000.0,
        time_divisor: 3600.0,
        capacity: CapacityCoercion::Truncate,
    };

    /// Raw slider units and quantities as supplied.
    // Unconverted units match what the routing service has always received
    // for trucks; see DESIGN.md before changing.
    pub const TRUCK: Self = Self {
        distance_divisor: 1.0,
        time_divisor: 1.0,
        capacity: CapacityCoercion::Verbatim,
    };

    /// Convert cost inputs into request costs.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "cost normalisation divides by the policy's unit divisors"
    )]
    pub fn costs(&self, inputs: &CostInputs) -> Costs {
        Costs {
            fixed: inputs.fixed,
            distance: inputs.distance / self.distance_divisor,
            time: inputs.time / self.time_divisor,
        }
    }
}

/// Cost slider values as entered by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    /// Fixed cost per used vehicle.
    pub fixed: f64,
    /// Cost per kilometre.
    pub distance: f64,
    /// Cost per hour.
    pub time: f64,
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            fixed: 5.0,
            distance: 5.0,
            time: 10.0,
        }
    }
}

/// Whole-hour shift bounds applied to every vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftHours {
    /// Hour the shift starts, `0..=23`.
    pub start: u8,
    /// Hour the shift ends, `start..=23`.
    pub end: u8,
}

impl Default for ShiftHours {
    fn default() -> Self {
        Self { start: 6, end: 23 }
    }
}

impl ShiftHours {
    /// Check both hours lie within the day and are ordered.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidShiftHours`] when either hour exceeds 23
    /// or the start is after the end.
    pub const fn validate(self) -> Result<(), BuildError> {
        if self.start > MAX_SHIFT_HOUR || self.end > MAX_SHIFT_HOUR || self.start > self.end {
            return Err(BuildError::InvalidShiftHours {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Everything besides the sheets needed to build a routing request.
///
/// The plan date is carried explicitly; nothing here is read from ambient
/// process state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanParameters {
    /// Day the plan is built for.
    pub date: NaiveDate,
    /// Cost inputs.
    pub costs: CostInputs,
    /// Capacity per vehicle in demand units.
    pub capacity: f64,
    /// Number of vehicles available.
    pub amount: f64,
    /// Vehicle profile.
    pub profile: Profile,
    /// Shift hours.
    pub shift: ShiftHours,
}

impl PlanParameters {
    /// Parameters for `date` with the planner form's default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tourplan_core::{PlanParameters, Profile};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
    /// let params = PlanParameters::with_defaults(date);
    /// assert_eq!(params.profile, Profile::Car);
    /// assert!(params.validate().is_ok());
    /// ```
    #[must_use]
    pub fn with_defaults(date: NaiveDate) -> Self {
        Self {
            date,
            costs: CostInputs::default(),
            capacity: 20.0,
            amount: 10.0,
            profile: Profile::Car,
            shift: ShiftHours::default(),
        }
    }

    /// Check every parameter lies within the range the form allows.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ParameterOutOfRange`] for cost inputs outside
    /// their slider range, [`BuildError::InvalidFleetParameter`] for a
    /// capacity or vehicle count outside `1..=MAX_FLEET_PARAMETER` and
    /// [`BuildError::InvalidShiftHours`] for inconsistent shift hours.
    pub fn validate(&self) -> Result<(), BuildError> {
        check_range("fixed cost", self.costs.fixed, &FIXED_COST_RANGE)?;
        check_range("distance cost", self.costs.distance, &DISTANCE_COST_RANGE)?;
        check_range("time cost", self.costs.time, &TIME_COST_RANGE)?;
        check_fleet_parameter("capacity", self.capacity)?;
        check_fleet_parameter("amount", self.amount)?;
        self.shift.validate()
    }
}

fn check_range(
    name: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), BuildError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(BuildError::ParameterOutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Reject capacity or vehicle counts below one, above
/// [`MAX_FLEET_PARAMETER`] or NaN.
pub(crate) fn check_fleet_parameter(name: &'static str, value: f64) -> Result<(), BuildError> {
    if (1.0..=MAX_FLEET_PARAMETER).contains(&value) {
        Ok(())
    } else {
        Err(BuildError::InvalidFleetParameter { name, value })
    }
}
