//! Control change classification.
//!
//! Control numbers 0-119 fall into four non-overlapping ranges:
//!
//! | range  | shape                     |
//! |--------|---------------------------|
//! | 0-31   | multi-byte, MSB           |
//! | 32-63  | multi-byte, LSB of `n-32` |
//! | 64-69  | switch                    |
//! | 70-119 | single-byte               |
//!
//! 120-127 select channel modes and are decoded elsewhere.

use serde::{Deserialize, Serialize};

/// Semantic name of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlLabel {
    BankSelect,
    ModulationWheel,
    BreathController,
    FootController,
    PortamentoTime,
    DataEntry,
    ChannelVolume,
    Balance,
    Pan,
    ExpressionController,
    EffectControl1,
    EffectControl2,
    GeneralPurpose1,
    GeneralPurpose2,
    GeneralPurpose3,
    GeneralPurpose4,
    DamperPedal,
    PortamentoToggle,
    SostenutoPedal,
    SoftPedal,
    LegatoFootswitch,
    Hold2,
    SoundVariation,
    TimbreHarmonicIntensity,
    ReleaseTime,
    AttackTime,
    Brightness,
    SoundController6,
    SoundController7,
    SoundController8,
    SoundController9,
    SoundController10,
    GeneralPurpose5,
    GeneralPurpose6,
    GeneralPurpose7,
    GeneralPurpose8,
    PortamentoControl,
    Effects1Depth,
    Effects2Depth,
    Effects3Depth,
    Effects4Depth,
    Effects5Depth,
    DataIncrement,
    DataDecrement,
    #[serde(rename = "nonRegisteredParameterNumberLSB")]
    NonRegisteredParameterNumberLsb,
    #[serde(rename = "nonRegisteredParameterNumberMSB")]
    NonRegisteredParameterNumberMsb,
    #[serde(rename = "registeredParameterNumberLSB")]
    RegisteredParameterNumberLsb,
    #[serde(rename = "registeredParameterNumberMSB")]
    RegisteredParameterNumberMsb,
    /// Reserved controller number
    Undefined,
}

/// Numbers with no assigned controller.
pub const UNDEFINED_CONTROL_NUMBERS: [u8; 40] = [
    3, 9, 14, 15, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 85, 86, 87, 88, 89, 90, 102,
    103, 104, 105, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115, 116, 117, 118, 119,
];

/// Looks up the label for a control number. LSB numbers share the label of
/// their MSB; anything above 119 is `Undefined`.
pub fn control_label(control_number: u8) -> ControlLabel {
    use ControlLabel::*;

    match control_number {
        0 => BankSelect,
        1 => ModulationWheel,
        2 => BreathController,
        4 => FootController,
        5 => PortamentoTime,
        6 => DataEntry,
        7 => ChannelVolume,
        8 => Balance,
        10 => Pan,
        11 => ExpressionController,
        12 => EffectControl1,
        13 => EffectControl2,
        16 => GeneralPurpose1,
        17 => GeneralPurpose2,
        18 => GeneralPurpose3,
        19 => GeneralPurpose4,
        32..=63 => control_label(control_number - 32),
        64 => DamperPedal,
        65 => PortamentoToggle,
        66 => SostenutoPedal,
        67 => SoftPedal,
        68 => LegatoFootswitch,
        69 => Hold2,
        70 => SoundVariation,
        71 => TimbreHarmonicIntensity,
        72 => ReleaseTime,
        73 => AttackTime,
        74 => Brightness,
        75 => SoundController6,
        76 => SoundController7,
        77 => SoundController8,
        78 => SoundController9,
        79 => SoundController10,
        80 => GeneralPurpose5,
        81 => GeneralPurpose6,
        82 => GeneralPurpose7,
        83 => GeneralPurpose8,
        84 => PortamentoControl,
        91 => Effects1Depth,
        92 => Effects2Depth,
        93 => Effects3Depth,
        94 => Effects4Depth,
        95 => Effects5Depth,
        96 => DataIncrement,
        97 => DataDecrement,
        98 => NonRegisteredParameterNumberLsb,
        99 => NonRegisteredParameterNumberMsb,
        100 => RegisteredParameterNumberLsb,
        101 => RegisteredParameterNumberMsb,
        _ => Undefined,
    }
}

/// Wire shape of a control number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlShape {
    MultiByteMsb,
    MultiByteLsb,
    Switch,
    SingleByte,
    Invalid,
}

pub fn control_shape(control_number: u8) -> ControlShape {
    match control_number {
        0..=31 => ControlShape::MultiByteMsb,
        32..=63 => ControlShape::MultiByteLsb,
        64..=69 => ControlShape::Switch,
        70..=119 => ControlShape::SingleByte,
        _ => ControlShape::Invalid,
    }
}

pub fn is_control_number(value: u8) -> bool {
    value <= 119
}

pub fn is_multi_byte_control_msb(value: u8) -> bool {
    control_shape(value) == ControlShape::MultiByteMsb
}

pub fn is_multi_byte_control_lsb(value: u8) -> bool {
    control_shape(value) == ControlShape::MultiByteLsb
}

pub fn is_switch_control_number(value: u8) -> bool {
    control_shape(value) == ControlShape::Switch
}

pub fn is_single_byte_control_number(value: u8) -> bool {
    control_shape(value) == ControlShape::SingleByte
}

pub fn is_non_registered_lsb(control_number: u8) -> bool {
    control_number == 98
}

pub fn is_non_registered_msb(control_number: u8) -> bool {
    control_number == 99
}

pub fn is_registered_lsb(control_number: u8) -> bool {
    control_number == 100
}

pub fn is_registered_msb(control_number: u8) -> bool {
    control_number == 101
}

pub fn is_registered_parameter_number(value: u8) -> bool {
    RegisteredParameter::from_number(value).is_some()
}

/// Parameters addressable through the registered parameter number protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegisteredParameter {
    PitchBendSensitivity,
    FineTuning,
    CoarseTuning,
    TuningProgramSelect,
    TuningBankSelect,
}

impl RegisteredParameter {
    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::PitchBendSensitivity),
            1 => Some(Self::FineTuning),
            2 => Some(Self::CoarseTuning),
            3 => Some(Self::TuningProgramSelect),
            4 => Some(Self::TuningBankSelect),
            _ => None,
        }
    }
}

/// Payload of a control change, keyed by control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "controlType", rename_all = "camelCase")]
pub enum ControlValue {
    /// An MSB message always carries `lsb: 0`; an LSB message carries no MSB
    /// and must be merged with whatever MSB was stored before.
    MultiByte { msb: Option<u8>, lsb: u8 },
    Switch { enabled: bool },
    SingleByte { value: u8 },
    #[serde(rename = "parameterNumberLSB")]
    ParameterNumberLsb { lsb: u8 },
    #[serde(rename = "parameterNumberMSB")]
    ParameterNumberMsb { msb: u8 },
}

/// A decoded control change. For multi-byte LSB messages `control_number`
/// is the number of the MSB slot the value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlChange {
    pub control_number: u8,
    pub label: ControlLabel,
    #[serde(flatten)]
    pub value: ControlValue,
}

/// Parses the data bytes of a control change message.
///
/// Returns `None` for numbers outside 0-119 and for a registered parameter
/// LSB selector whose value is not a registered parameter.
pub fn parse_control_change(control_number: u8, value: u8) -> Option<ControlChange> {
    let label = control_label(control_number);
    let (control_number, value) = match control_shape(control_number) {
        ControlShape::MultiByteMsb => (
            control_number,
            ControlValue::MultiByte {
                msb: Some(value),
                lsb: 0,
            },
        ),
        ControlShape::MultiByteLsb => (
            control_number - 32,
            ControlValue::MultiByte {
                msb: None,
                lsb: value,
            },
        ),
        ControlShape::Switch => (
            control_number,
            ControlValue::Switch {
                enabled: value >= 64,
            },
        ),
        ControlShape::SingleByte => {
            if is_registered_lsb(control_number) && !is_registered_parameter_number(value) {
                return None;
            }
            (control_number, ControlValue::SingleByte { value })
        }
        ControlShape::Invalid => return None,
    };

    Some(ControlChange {
        control_number,
        label,
        value,
    })
}
