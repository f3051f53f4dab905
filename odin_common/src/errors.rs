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

use crate::define_error;

pub type Result<T> = std::result::Result<T,OdinCommonError>;

define_error!{ pub OdinCommonError =
    IOError( #[from] std::io::Error ) : "IO error: {0}",
    ChronoParseError( #[from] chrono::ParseError ) : "chrono parse error: {0}",
    FieldError( String ) : "field error: {0}",
    OutOfRange( String ) : "value out of range: {0}",
    OpFailed( String ) : "operation failed: {0}"
}
