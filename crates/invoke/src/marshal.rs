//! Conversion of host [`Value`]s into [`Argument`]s.

use crate::{Argument, InvokeError, Value};
use alloc::{ffi::CString, string::ToString as _, vec::Vec};
use ctorbridge_info::{ArgInfo, BasicType, Direction, InfoType, Transfer, TypeInfo, TypeTag};
use ctorbridge_object::Object;

/// Keeps the data referred to by marshalled [`Argument`]s alive until the native call returns.
#[derive(Default)]
pub(crate) struct Marshaller {
    strings: Vec<CString>,
    objects: Vec<Object>,
}

fn integer<T: TryFrom<i64>>(index: usize, tag: TypeTag, value: i64) -> Result<T, InvokeError> {
    T::try_from(value).map_err(|_| InvokeError::OutOfRange { index, tag, value })
}

impl Marshaller {
    /// Converts the `value` passed for the argument at `index`.
    pub(crate) fn marshal(
        &mut self,
        index: usize,
        arg: &ArgInfo,
        value: &Value,
    ) -> Result<Argument, InvokeError> {
        if arg.direction() != Direction::In {
            return Err(InvokeError::UnsupportedDirection {
                index,
                direction: arg.direction(),
            });
        }

        if value.is_nil() && arg.type_info().is_pointer() {
            return if arg.may_be_null() {
                Ok(Argument::ZERO)
            } else {
                Err(InvokeError::NullArgument {
                    index,
                    name: arg.name().into(),
                })
            };
        }

        let type_mismatch = || InvokeError::ArgumentType {
            index,
            name: arg.name().into(),
            expected: arg.type_info().to_string().into_boxed_str(),
            actual: value.kind(),
        };

        let unsupported = || InvokeError::UnsupportedType {
            index,
            type_name: arg.type_info().to_string().into_boxed_str(),
        };

        let tag = arg.type_info().tag();
        match arg.type_info() {
            TypeInfo::Basic(basic) => match (basic, value) {
                (BasicType::Boolean, Value::Bool(b)) => Ok(Argument::from_bool(*b)),
                (BasicType::Int8, Value::Integer(i)) => {
                    integer(index, tag, *i).map(Argument::from_i8)
                }
                (BasicType::UInt8, Value::Integer(i)) => {
                    integer(index, tag, *i).map(Argument::from_u8)
                }
                (BasicType::Int16, Value::Integer(i)) => {
                    integer(index, tag, *i).map(Argument::from_i16)
                }
                (BasicType::UInt16, Value::Integer(i)) => {
                    integer(index, tag, *i).map(Argument::from_u16)
                }
                (BasicType::Int32, Value::Integer(i)) => {
                    integer(index, tag, *i).map(Argument::from_i32)
                }
                (BasicType::UInt32 | BasicType::Unichar, Value::Integer(i)) => {
                    integer(index, tag, *i).map(Argument::from_u32)
                }
                (BasicType::Unichar, Value::String(s)) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Argument::from_u32(u32::from(c))),
                        _ => Err(type_mismatch()),
                    }
                }
                (BasicType::Int64, Value::Integer(i)) => Ok(Argument::from_i64(*i)),
                (BasicType::UInt64 | BasicType::GType, Value::Integer(i)) => {
                    integer(index, tag, *i).map(Argument::from_u64)
                }
                #[allow(clippy::cast_possible_truncation)]
                (BasicType::Float, Value::Float(f)) => Ok(Argument::from_f32(*f as f32)),
                #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
                (BasicType::Float, Value::Integer(i)) => Ok(Argument::from_f32(*i as f32)),
                (BasicType::Double, Value::Float(f)) => Ok(Argument::from_f64(*f)),
                #[allow(clippy::cast_precision_loss)]
                (BasicType::Double, Value::Integer(i)) => Ok(Argument::from_f64(*i as f64)),
                (BasicType::Utf8 | BasicType::Filename, Value::String(s)) => {
                    let c_string =
                        CString::new(s.as_bytes()).map_err(|_| InvokeError::InteriorNul { index })?;

                    // Moving the `CString` into the `Vec` does not move its heap allocation.
                    let pointer = c_string.as_ptr().cast_mut().cast::<()>();
                    self.strings.push(c_string);
                    Ok(Argument::from_pointer(pointer))
                }
                (
                    BasicType::Void
                    | BasicType::GList
                    | BasicType::GSList
                    | BasicType::GHash
                    | BasicType::Error,
                    _,
                ) => Err(unsupported()),
                _ => Err(type_mismatch()),
            },
            TypeInfo::Interface(info) => match info.info_type() {
                InfoType::Object | InfoType::Interface => {
                    let object = value.object().ok_or_else(type_mismatch)?;
                    if arg.transfer() == Transfer::Everything {
                        // The callee keeps the reference.
                        return Ok(Argument::from_object(object.into_raw()));
                    }

                    let argument = Argument::from_object(object.as_raw());
                    self.objects.push(object);
                    Ok(argument)
                }
                InfoType::Enum => match value {
                    Value::Integer(i) => integer(index, tag, *i).map(Argument::from_i32),
                    _ => Err(type_mismatch()),
                },
                InfoType::Flags => match value {
                    Value::Integer(i) => integer(index, tag, *i).map(Argument::from_u32),
                    _ => Err(type_mismatch()),
                },
                _ => Err(unsupported()),
            },
            _ => Err(unsupported()),
        }
    }
}

impl Marshaller {
    /// Converts the instance passed to a method.
    pub(crate) fn instance(
        &mut self,
        info: &ctorbridge_info::CallableInfo,
        value: &Value,
    ) -> Result<Argument, InvokeError> {
        let object = value.object().ok_or_else(|| InvokeError::InvalidInstance {
            container: info.container().unwrap_or_default().into(),
            actual: value.kind(),
        })?;

        let argument = Argument::from_object(object.as_raw());
        self.objects.push(object);
        Ok(argument)
    }
}
