//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use std::time::Duration;

use crate::guid::Guid;
use crate::resolver::TypeShape;
use crate::serialization::{Codec, DeserializationError, Reader, SerializationError, Writer};
use crate::timestamp::Timestamp;

impl Codec for Timestamp {
    const FIXED_SIZE: Option<usize> = Some(8);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_i64(self.to_binary());
        Ok(())
    }

    /// Applies the reader's forced kind, if any, without touching the ticks.
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let raw = reader.read_i64()?;
        let value = Timestamp::from_binary(raw).ok_or_else(|| {
            let message = format!("binary form {raw:#018x} is out of range");
            DeserializationError::invalid_value("Timestamp", message)
        })?;
        Ok(match reader.date_time_kind() {
            Some(kind) => value.specify_kind(kind),
            None => value,
        })
    }
}

impl Codec for Guid {
    const FIXED_SIZE: Option<usize> = Some(16);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_bytes(self.as_bytes());
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        reader.read_array::<16>().map(Guid::from_bytes)
    }
}

impl Codec for Duration {
    const FIXED_SIZE: Option<usize> = Some(12);

    fn shape() -> TypeShape {
        TypeShape::primitive::<Self>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), SerializationError> {
        writer.write_u64(self.as_secs());
        writer.write_u32(self.subsec_nanos());
        Ok(())
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, DeserializationError> {
        let secs = reader.read_u64()?;
        let nanos = reader.read_u32()?;
        if nanos >= 1_000_000_000 {
            return Err(DeserializationError::invalid_value(
                "Duration",
                format!("{nanos} nanoseconds exceed one second"),
            ));
        }
        Ok(Duration::new(secs, nanos))
    }
}
