/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/* #region define_cli  ****************************************************************************************/

/// syntactic sugar macro for clap (derive) based command line interface definition
/// ```ignore
/// define_cli! { ARGS [about="my silly prog"] =
///   verbose: bool          [help="run verbose", short, long],
///   config: Option<String> [help="pathname of config", long],
///   url: String            [help="URL of feed"]
/// }
///
/// fn main () {
///    check_cli!(ARGS); // makes sure we exit on -h or --help (and do not execute anything until we know ARGS parsed)
///    ...
///    let url = &ARGS.url;
///    ...
/// }
/// ```
/// expands into:
/// ```ignore
/// use clap::Parser;
/// use lazy_static::lazy_static;
///
/// #[derive(Parser)]
/// #[command(about = "my silly prog")]
/// struct CliOpts {
///     #[arg(help = "run verbose", short, long)]
///     verbose: bool,
///     ...
///     #[arg(skip=true)] // hidden field to check initialization without referencing any of the arg fields
///     _initialized: bool
/// }
/// lazy_static! { static ref ARGS: CliOpts = CliOpts::parse(); }
/// ```
#[macro_export]
macro_rules! define_cli {
    ($name:ident [ $( $sopt:ident $(= $sx:expr)? ),* ] = $( $( #[$meta:meta] )? $fname:ident : $ftype:ty [ $( $fopt:ident $(= $fx:expr)?),* ] ),* ) => {
        use clap::Parser;
        use lazy_static::lazy_static;

        #[derive(Parser)]
        #[command( $( $sopt $(=$sx)? ),* )]
        struct CliOpts {
            $(
                #[arg( $( $fopt $(=$fx)? ),* )]
                $(#[$meta])?
                $fname : $ftype,
            )*
            #[arg(skip=true)]
            _initialized: bool
        }
        lazy_static! { static ref $name: CliOpts = CliOpts::parse(); }
    }
}

#[macro_export]
macro_rules! check_cli {
    ($sopt:ident) => { { let _is_initialized = &$sopt._initialized; } }
}

/// syntactic sugar macro to define thiserror Error enums:
/// ```ignore
/// define_error!{ pub OdinNetError =
///   IOError( #[from] std::io::Error ) : "IO error: {0}",
///   OpFailed(String) : "operation failed: {0}"
/// }
/// ```
/// will get expanded into
/// ```ignore
/// #[derive(thiserror::Error,Debug)]
/// pub enum OdinNetError {
///     #[error("IO error: {0}")]
///     IOError(#[from] std::io::Error),
///
///     #[error("operation failed: {0}")]
///     OpFailed(String),
/// }
/// ```
#[macro_export]
macro_rules! define_error {
    ($vis:vis $name:ident = $( $err_variant:ident ( $( $( #[$meta:meta] )? $field_type:ty),* ) : $msg_lit:literal ),*) => {
        #[derive(thiserror::Error,Debug)]
        $vis enum $name {
            $(
                #[error($msg_lit)]
                $err_variant ( $( $(#[$meta])? $field_type ),*  )
            ),*
        }
    }
}

/* #endregion define_cli */

/* #region extract_fields ****************************************************************************************/

/// syntactic sugar for if-let chains that extract typed, non-blank columns from a [`CsvFieldExtractor`]
/// (see `u8extractor` module). The main block is only executed if all fields are present and valid.
/// Use like so:
/// ```ignore
/// extract_fields!{ csv ?
///     let latitude: f64 = [14],
///     let longitude: f64 = [15] => {
///         println!("position: {latitude},{longitude}");
///     } else {
///         println!("no position in {}", csv.line());
///     }
/// }
/// ```
/// which gets expanded into:
/// ```ignore
/// if let Some(latitude) = csv.field::<f64>(14)
/// && let Some(longitude) = csv.field::<f64>(15) {
///     println!("position: {latitude},{longitude}");
/// } else {
///     println!("no position in {}", csv.line());
/// }
/// ```
/// [`CsvFieldExtractor`]: crate::u8extractor::CsvFieldExtractor
#[macro_export]
macro_rules! extract_fields {
    ($csv:ident ? $( let $var:ident : $vt:ty = [ $idx:expr ] ),* => $blk:block $( else $else_blk:block )?) => {
        {
            if $( let Some($var) = $csv.field::<$vt>( $idx) )&&*
            $blk
            $( else $else_blk )?
        }
    }
}

/* #endregion extract_fields */

/* #region impl_virt_deserialize *********************************************************************************/

/// implement serde Deserialize trait not backed by structure fields
/// This macro uses arguments to define structure name, a constructor fn name and virtual deserialization field names to
/// generate a Deserializer impl. It also suppors optional aliases for each field name.
/// The constructor has to accept the deserialized values in the order specified. The constructor argument types define
/// the respective argument deserialization
///
/// Use like so:
/// ```ignore
/// struct GeoPoint3 {...}
/// impl GeoPoint3 {
///   fn from_lon_lat_degrees_alt_meters (lon: .., lat: .., alt: ..)->Self {...}
/// }
///
/// impl_deserialize_struct!{ GeoPoint3::from_lon_lat_degrees_alt_meters( lon | longitude, lat | latitude, alt = 0.0) }
/// ```
#[macro_export]
macro_rules! impl_deserialize_struct {
    ( $type_name:ident :: $ctor_name:ident ( $( $field_name:ident $( | $alt_name:ident )*  $( = $def_val:expr )? ),+ )) => {
        impl<'de> DeserializeTrait<'de> for $type_name {
            fn deserialize<D>(deserializer: D) -> Result<$type_name, D::Error> where D: Deserializer<'de> {
                const FIELDS: &[&str] = &[ $( stringify!($field_name) ),+ ];

                #[allow(non_camel_case_types)]
                enum Field { $( $field_name ),+ }

                impl<'de> DeserializeTrait<'de> for Field {
                    fn deserialize<D>(deserializer: D) -> Result<Field, D::Error> where D: Deserializer<'de> {
                        struct FieldVisitor;

                        impl<'de> Visitor<'de> for FieldVisitor {
                            type Value = Field;

                            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                                formatter.write_str( stringify!( $($field_name),+) )
                            }

                            fn visit_str<E>(self, value: &str) -> Result<Field, E> where E: de::Error {
                                match value {
                                    $( stringify!($field_name) $( | stringify!($alt_name) )* => Ok(Field::$field_name), )+
                                    _ => Err(de::Error::unknown_field(value, FIELDS)),
                                }
                            }
                        }
                        deserializer.deserialize_identifier(FieldVisitor)
                    }
                }

                struct TypeVisitor;

                impl<'de> Visitor<'de> for TypeVisitor {
                    type Value = $type_name;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str( stringify!( struct $type_name) )
                    }

                    fn visit_seq<V>(self, mut seq: V) -> Result< $type_name, V::Error> where V: SeqAccess<'de> {
                        $( let $field_name = seq.next_element()?.ok_or_else(|| de::Error::invalid_length( Field::$field_name as usize, &self))?; )+
                        Ok( $type_name::$ctor_name( $( $field_name ),+ ) )
                    }

                    fn visit_map<V>(self, mut map: V) -> Result< $type_name, V::Error> where V: MapAccess<'de> {
                        $( let mut $field_name = None; )+

                        while let Some(key) = map.next_key()? {
                            match key {
                                $(
                                    Field::$field_name => {
                                        if $field_name .is_some() { {return Err(de::Error::duplicate_field( stringify!($field_name)));} }
                                        $field_name = Some(map.next_value()?);
                                    }
                                )+
                            }
                        }

                        $(
                            $( let $field_name = $field_name.or( Some($def_val) ); )?
                            let $field_name = $field_name .ok_or_else(|| de::Error::missing_field(stringify!($field_name)))?;
                        )+
                        Ok( $type_name::$ctor_name( $( $field_name ),+ ) )
                    }
                }

                deserializer.deserialize_struct( stringify!($type_name), FIELDS, TypeVisitor)
            }
        }
    }
}

/* #endregion impl_virt_deserialize */
