//! The writer boundary: the trait physical serializers implement, the up-front
//! compatibility check, and a canonical in-memory reference writer.
//!
//! The crate itself stops at format-agnostic records; turning them into an actual PDB
//! stream is the writer's job. What the crate does own is the contract: a writer
//! declares the format it targets and whether it can produce deterministic output, and
//! [`emit_module`] refuses the whole emit up front when the writer cannot satisfy the
//! requested options. A failed emit never leaves partial output behind.
//!
//! [`RecordInspector`] is the reference writer: it serializes every record into one
//! canonical byte form using the compressed integer encoding of ECMA-335 §II.23.2.
//! Identical modules produce identical bytes, which is what the determinism tests
//! compare.

use uguid::Guid;

use crate::emit::options::EmitOptions;
use crate::records::customdebuginfo::{CustomDebugInfo, ForwardRecord, SlotOrConstant};
use crate::records::imports::{ExternAliasInfo, ImportEntry, ImportScopeRecord};
use crate::records::method::ModuleDebugInfo;
use crate::records::scope::Scope;
use crate::records::sequencepoint::{SequencePointEntry, HIDDEN_LINE_SENTINEL};
use crate::lowered::symbols::ConstantValue;
use crate::{Error, Result};

/// A physical debug information serializer.
///
/// Implementations live outside this crate; [`RecordInspector`] exists for tests and
/// tooling that want a canonical byte view of a module.
pub trait DebugRecordWriter {
    /// The format this writer produces.
    fn format(&self) -> crate::emit::options::DebugFormat;

    /// Whether this writer can produce byte-reproducible output.
    fn supports_deterministic(&self) -> bool;

    /// Serialize one module's debug information.
    ///
    /// # Errors
    ///
    /// Implementation-defined serialization failures, surfaced as [`Error::Emit`].
    fn write_module(&mut self, module: &ModuleDebugInfo) -> Result<()>;
}

/// Check that `writer` can satisfy `options` before anything is written.
///
/// # Errors
///
/// Returns [`Error::IncompatibleWriter`] when the writer targets a different format
/// than requested, or a deterministic emit was requested from a writer that cannot
/// provide one.
pub fn validate_writer_compatibility(
    writer: &dyn DebugRecordWriter,
    options: &EmitOptions,
) -> Result<()> {
    if writer.format() != options.format {
        return Err(Error::IncompatibleWriter {
            format: options.format,
            reason: format!("writer targets {}", writer.format()),
        });
    }
    if options.is_deterministic() && !writer.supports_deterministic() {
        return Err(Error::IncompatibleWriter {
            format: options.format,
            reason: "writer cannot produce deterministic output".to_string(),
        });
    }
    Ok(())
}

/// Validate the writer against the options, then hand the module over.
///
/// # Errors
///
/// [`Error::IncompatibleWriter`] from validation, or whatever the writer reports.
pub fn emit_module(
    writer: &mut dyn DebugRecordWriter,
    module: &ModuleDebugInfo,
    options: &EmitOptions,
) -> Result<()> {
    validate_writer_compatibility(writer, options)?;
    writer.write_module(module)
}

/// Append an ECMA-335 compressed unsigned integer.
///
/// # Errors
///
/// Returns [`Error::Emit`] for values above `0x1FFF_FFFF`, which the encoding cannot
/// represent.
pub fn write_compressed_uint(buffer: &mut Vec<u8>, value: u32) -> Result<()> {
    if value < 0x80 {
        buffer.push(value as u8);
    } else if value < 0x4000 {
        buffer.extend_from_slice(&(value as u16 | 0x8000).to_be_bytes());
    } else if value <= 0x1FFF_FFFF {
        buffer.extend_from_slice(&(value | 0xC000_0000).to_be_bytes());
    } else {
        return Err(Error::Emit(format!(
            "value {value:#x} exceeds the compressed integer range"
        )));
    }
    Ok(())
}

/// Append an ECMA-335 compressed signed integer: the value is taken as a 7, 14 or
/// 29-bit two's complement number, rotated left one bit within that width so the sign
/// bit lands in the low bit, then compressed like an unsigned value.
///
/// # Errors
///
/// Returns [`Error::Emit`] for values outside `-2^28 ..= 2^28 - 1`.
pub fn write_compressed_int(buffer: &mut Vec<u8>, value: i32) -> Result<()> {
    fn rotate(value: i32, bits: u32) -> u32 {
        let mask = (1u32 << bits) - 1;
        let truncated = (value as u32) & mask;
        ((truncated << 1) | (truncated >> (bits - 1))) & mask
    }

    if (-(1 << 6)..(1 << 6)).contains(&value) {
        buffer.push(rotate(value, 7) as u8);
    } else if (-(1 << 13)..(1 << 13)).contains(&value) {
        buffer.extend_from_slice(&(rotate(value, 14) as u16 | 0x8000).to_be_bytes());
    } else if (-(1 << 28)..(1 << 28)).contains(&value) {
        buffer.extend_from_slice(&(rotate(value, 29) | 0xC000_0000).to_be_bytes());
    } else {
        return Err(Error::Emit(format!(
            "value {value} exceeds the compressed signed integer range"
        )));
    }
    Ok(())
}

/// The canonical in-memory reference writer.
///
/// Serializes the full module into one buffer. The byte form is this crate's own
/// canonical layout, not a physical PDB stream; its only promises are that it is
/// total (every record field lands in the buffer) and deterministic.
#[derive(Debug, Default)]
pub struct RecordInspector {
    buffer: Vec<u8>,
}

impl RecordInspector {
    /// Create an empty inspector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The serialized bytes written so far.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the inspector, returning the serialized bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        write_compressed_uint(&mut self.buffer, text.len() as u32)?;
        self.buffer.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn write_guid(&mut self, guid: Guid) {
        self.buffer.extend_from_slice(&guid.to_bytes());
    }

    fn write_sequence_point(&mut self, entry: &SequencePointEntry) -> Result<()> {
        write_compressed_uint(&mut self.buffer, entry.il_offset())?;
        write_compressed_uint(&mut self.buffer, entry.document().0)?;
        match entry {
            SequencePointEntry::Hidden { .. } => {
                write_compressed_uint(&mut self.buffer, HIDDEN_LINE_SENTINEL)?;
            }
            SequencePointEntry::Visible { span, .. } => {
                write_compressed_uint(&mut self.buffer, span.start_line)?;
                write_compressed_uint(&mut self.buffer, u32::from(span.start_col))?;
                write_compressed_uint(&mut self.buffer, span.end_line)?;
                write_compressed_uint(&mut self.buffer, u32::from(span.end_col))?;
            }
        }
        Ok(())
    }

    fn write_scope(&mut self, scope: &Scope) -> Result<()> {
        write_compressed_uint(&mut self.buffer, scope.start_offset)?;
        write_compressed_uint(&mut self.buffer, scope.end_offset)?;

        write_compressed_uint(&mut self.buffer, scope.locals.len() as u32)?;
        for local in &scope.locals {
            write_compressed_uint(&mut self.buffer, u32::from(local.slot))?;
            write_compressed_uint(&mut self.buffer, u32::from(local.attributes.bits()))?;
            self.write_str(&local.name)?;
        }

        write_compressed_uint(&mut self.buffer, scope.constants.len() as u32)?;
        for constant in &scope.constants {
            self.write_str(&constant.name)?;
            self.write_constant(&constant.value)?;
        }

        write_compressed_uint(&mut self.buffer, scope.children.len() as u32)?;
        for child in &scope.children {
            self.write_scope(child)?;
        }
        Ok(())
    }

    fn write_constant(&mut self, value: &ConstantValue) -> Result<()> {
        match value {
            ConstantValue::Null => self.buffer.push(0),
            ConstantValue::Boolean(flag) => {
                self.buffer.push(1);
                self.buffer.push(u8::from(*flag));
            }
            ConstantValue::Int32(value) => {
                self.buffer.push(2);
                self.buffer.extend_from_slice(&value.to_le_bytes());
            }
            ConstantValue::Int64(value) => {
                self.buffer.push(3);
                self.buffer.extend_from_slice(&value.to_le_bytes());
            }
            ConstantValue::String(text) => {
                self.buffer.push(4);
                self.write_str(text)?;
            }
        }
        Ok(())
    }

    fn write_import_scope(&mut self, chain: &ImportScopeRecord) -> Result<()> {
        write_compressed_uint(&mut self.buffer, chain.groups.len() as u32)?;
        for group in &chain.groups {
            write_compressed_uint(&mut self.buffer, group.len() as u32)?;
            for entry in &group.entries {
                match entry {
                    ImportEntry::Namespace { namespace } => {
                        self.buffer.push(0);
                        self.write_str(namespace)?;
                    }
                    ImportEntry::Alias { alias, target } => {
                        self.buffer.push(1);
                        self.write_str(alias)?;
                        self.write_str(target)?;
                    }
                    ImportEntry::ExternAlias { alias } => {
                        self.buffer.push(2);
                        self.write_str(alias)?;
                    }
                    ImportEntry::TypeImport { type_name } => {
                        self.buffer.push(3);
                        self.write_str(type_name)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_extern_alias(&mut self, info: &ExternAliasInfo) -> Result<()> {
        self.write_str(&info.alias)?;
        self.write_str(&info.assembly.name)?;
        let (major, minor, build, revision) = info.assembly.version;
        for part in [major, minor, build, revision] {
            write_compressed_uint(&mut self.buffer, u32::from(part))?;
        }
        match info.assembly.public_key_token {
            Some(token) => {
                self.buffer.push(1);
                self.buffer.extend_from_slice(&token);
            }
            None => self.buffer.push(0),
        }
        Ok(())
    }

    fn write_custom_debug_info(&mut self, info: &CustomDebugInfo) -> Result<()> {
        match info.kind().guid() {
            Some(guid) => self.write_guid(guid),
            None => {
                // Structural kinds have no format GUID; a reserved tag byte stands in.
                self.buffer.push(0xFF);
                self.write_str(&info.kind().to_string())?;
            }
        }

        match info {
            CustomDebugInfo::Forward(ForwardRecord { kind, target }) => {
                self.write_str(&kind.to_string())?;
                write_compressed_uint(&mut self.buffer, target.0)?;
            }
            CustomDebugInfo::DynamicLocals(records) => {
                write_compressed_uint(&mut self.buffer, records.len() as u32)?;
                for record in records {
                    self.write_target(&record.target)?;
                    self.buffer.push(record.count);
                    self.buffer.extend_from_slice(&record.flags.to_le_bytes());
                }
            }
            CustomDebugInfo::TupleElementNames(records) => {
                write_compressed_uint(&mut self.buffer, records.len() as u32)?;
                for record in records {
                    self.write_target(&record.target)?;
                    write_compressed_uint(&mut self.buffer, record.start_offset)?;
                    write_compressed_uint(&mut self.buffer, record.end_offset)?;
                    write_compressed_uint(&mut self.buffer, record.names.len() as u32)?;
                    for name in &record.names {
                        match name {
                            Some(name) => {
                                self.buffer.push(1);
                                self.write_str(name)?;
                            }
                            None => self.buffer.push(0),
                        }
                    }
                }
            }
            CustomDebugInfo::EncLocalSlotMap(identities) => {
                write_compressed_uint(&mut self.buffer, identities.len() as u32)?;
                for identity in identities {
                    self.buffer.push(identity.kind as u8);
                    write_compressed_int(&mut self.buffer, identity.syntax_offset.0)?;
                    write_compressed_uint(&mut self.buffer, u32::from(identity.ordinal))?;
                }
            }
            CustomDebugInfo::EncLambdaMap { lambdas, closures } => {
                write_compressed_uint(&mut self.buffer, closures.len() as u32)?;
                for closure in closures {
                    write_compressed_int(&mut self.buffer, closure.syntax_offset.0)?;
                }
                write_compressed_uint(&mut self.buffer, lambdas.len() as u32)?;
                for lambda in lambdas {
                    write_compressed_int(&mut self.buffer, lambda.syntax_offset.0)?;
                    match lambda.closure_ordinal {
                        Some(ordinal) => {
                            self.buffer.push(1);
                            write_compressed_uint(&mut self.buffer, ordinal)?;
                        }
                        None => self.buffer.push(0),
                    }
                }
            }
            CustomDebugInfo::HoistedLocalScopes(scopes) => {
                write_compressed_uint(&mut self.buffer, scopes.len() as u32)?;
                for scope in scopes {
                    write_compressed_uint(&mut self.buffer, scope.field_index)?;
                    write_compressed_uint(&mut self.buffer, scope.start_offset)?;
                    write_compressed_uint(&mut self.buffer, scope.end_offset)?;
                }
            }
            CustomDebugInfo::StateMachineLink {
                kickoff,
                catch_handler_offsets,
            } => {
                write_compressed_uint(&mut self.buffer, kickoff.0)?;
                write_compressed_uint(&mut self.buffer, catch_handler_offsets.len() as u32)?;
                for offset in catch_handler_offsets {
                    write_compressed_uint(&mut self.buffer, *offset)?;
                }
            }
            CustomDebugInfo::StateMachineKickoff { move_next } => {
                write_compressed_uint(&mut self.buffer, move_next.0)?;
            }
        }
        Ok(())
    }

    fn write_target(&mut self, target: &SlotOrConstant) -> Result<()> {
        match target {
            SlotOrConstant::Slot(slot) => {
                self.buffer.push(0);
                write_compressed_uint(&mut self.buffer, u32::from(*slot))?;
            }
            SlotOrConstant::Constant { name } => {
                self.buffer.push(1);
                self.write_str(name)?;
            }
        }
        Ok(())
    }
}

impl DebugRecordWriter for RecordInspector {
    fn format(&self) -> crate::emit::options::DebugFormat {
        crate::emit::options::DebugFormat::Portable
    }

    fn supports_deterministic(&self) -> bool {
        true
    }

    fn write_module(&mut self, module: &ModuleDebugInfo) -> Result<()> {
        self.buffer.extend_from_slice(b"DPDB");

        write_compressed_uint(&mut self.buffer, module.documents.len() as u32)?;
        for document in &module.documents {
            self.write_str(&document.path)?;
            self.write_guid(document.language);
            self.write_guid(document.checksum_algorithm);
            write_compressed_uint(&mut self.buffer, document.checksum.len() as u32)?;
            self.buffer.extend_from_slice(&document.checksum);
        }

        write_compressed_uint(&mut self.buffer, module.records.len() as u32)?;
        for record in &module.records {
            write_compressed_uint(&mut self.buffer, record.method.0)?;

            write_compressed_uint(&mut self.buffer, record.sequence_points.len() as u32)?;
            for entry in &record.sequence_points.0 {
                self.write_sequence_point(entry)?;
            }

            match &record.root_scope {
                Some(scope) => {
                    self.buffer.push(1);
                    self.write_scope(scope)?;
                }
                None => self.buffer.push(0),
            }

            match &record.import_scope {
                Some(chain) => {
                    self.buffer.push(1);
                    self.write_import_scope(chain)?;
                }
                None => self.buffer.push(0),
            }

            write_compressed_uint(&mut self.buffer, record.custom_debug_info.len() as u32)?;
            for info in &record.custom_debug_info {
                self.write_custom_debug_info(info)?;
            }
        }

        write_compressed_uint(&mut self.buffer, module.extern_aliases.len() as u32)?;
        for info in &module.extern_aliases {
            self.write_extern_alias(info)?;
        }

        match &module.deterministic {
            Some(info) => {
                self.buffer.push(1);
                self.write_str(&info.compiler_version)?;
                write_compressed_uint(&mut self.buffer, info.options().len() as u32)?;
                for (key, value) in info.options() {
                    self.write_str(key)?;
                    self.write_str(value)?;
                }
                write_compressed_uint(&mut self.buffer, info.references.len() as u32)?;
                for reference in &info.references {
                    self.write_str(&reference.name)?;
                    self.buffer.extend_from_slice(&reference.timestamp.to_le_bytes());
                    self.buffer.extend_from_slice(&reference.image_size.to_le_bytes());
                    self.write_guid(reference.mvid);
                    write_compressed_uint(&mut self.buffer, reference.extern_aliases.len() as u32)?;
                    for alias in &reference.extern_aliases {
                        self.write_str(alias)?;
                    }
                    self.write_str(&reference.image_kind.to_string())?;
                    self.buffer.push(u8::from(reference.embed_interop_types));
                }
            }
            None => self.buffer.push(0),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::options::DebugFormat;
    use crate::records::method::{MethodDebugRecord, MethodId};

    struct NonDeterministicWriter;

    impl DebugRecordWriter for NonDeterministicWriter {
        fn format(&self) -> DebugFormat {
            DebugFormat::Windows
        }
        fn supports_deterministic(&self) -> bool {
            false
        }
        fn write_module(&mut self, _module: &ModuleDebugInfo) -> Result<()> {
            Ok(())
        }
    }

    fn empty_module() -> ModuleDebugInfo {
        ModuleDebugInfo {
            records: vec![MethodDebugRecord::new(MethodId(0))],
            documents: Vec::new(),
            extern_aliases: Vec::new(),
            deterministic: None,
        }
    }

    #[test]
    fn compressed_uint_boundaries() {
        let cases: [(u32, &[u8]); 6] = [
            (0x00, &[0x00]),
            (0x7F, &[0x7F]),
            (0x80, &[0x80, 0x80]),
            (0x3FFF, &[0xBF, 0xFF]),
            (0x4000, &[0xC0, 0x00, 0x40, 0x00]),
            (0x1FFF_FFFF, &[0xDF, 0xFF, 0xFF, 0xFF]),
        ];
        for (value, expected) in cases {
            let mut buffer = Vec::new();
            write_compressed_uint(&mut buffer, value).unwrap();
            assert_eq!(buffer, expected, "value {value:#x}");
        }
        assert!(write_compressed_uint(&mut Vec::new(), 0x2000_0000).is_err());
    }

    #[test]
    fn hidden_sentinel_encoding() {
        let mut buffer = Vec::new();
        write_compressed_uint(&mut buffer, HIDDEN_LINE_SENTINEL).unwrap();
        assert_eq!(buffer, [0xC0, 0xFE, 0xEF, 0xEE]);
    }

    #[test]
    fn compressed_int_matches_the_format_examples() {
        let cases: [(i32, &[u8]); 6] = [
            (3, &[0x06]),
            (-3, &[0x7B]),
            (64, &[0x80, 0x80]),
            (-64, &[0x01]),
            (8192, &[0xC0, 0x00, 0x40, 0x00]),
            (-8192, &[0x80, 0x01]),
        ];
        for (value, expected) in cases {
            let mut buffer = Vec::new();
            write_compressed_int(&mut buffer, value).unwrap();
            assert_eq!(buffer, expected, "value {value}");
        }

        assert!(write_compressed_int(&mut Vec::new(), 1 << 28).is_err());
        assert!(write_compressed_int(&mut Vec::new(), -(1 << 28) - 1).is_err());
    }

    #[test]
    fn incompatible_format_is_refused() {
        let writer = NonDeterministicWriter;
        let options = EmitOptions::new(DebugFormat::Portable);
        let err = validate_writer_compatibility(&writer, &options).unwrap_err();
        assert!(matches!(err, Error::IncompatibleWriter { .. }));
    }

    #[test]
    fn deterministic_request_needs_a_capable_writer() {
        use crate::emit::deterministic::DeterministicBuildInfo;

        let writer = NonDeterministicWriter;
        let options = EmitOptions::new(DebugFormat::Windows)
            .with_deterministic(DeterministicBuildInfo::new("4.9.2-test"));
        assert!(validate_writer_compatibility(&writer, &options).is_err());

        let options = EmitOptions::new(DebugFormat::Windows);
        assert!(validate_writer_compatibility(&writer, &options).is_ok());
    }

    #[test]
    fn emit_writes_nothing_when_validation_fails() {
        let mut inspector = RecordInspector::new();
        let options = EmitOptions::new(DebugFormat::Windows);
        assert!(emit_module(&mut inspector, &empty_module(), &options).is_err());
        assert!(inspector.bytes().is_empty());
    }

    #[test]
    fn identical_modules_serialize_identically() {
        let module = empty_module();
        let mut first = RecordInspector::new();
        let mut second = RecordInspector::new();
        first.write_module(&module).unwrap();
        second.write_module(&module).unwrap();
        assert_eq!(first.bytes(), second.bytes());
        assert!(!first.bytes().is_empty());
    }
}
