//! Lambda and closure mapping for Edit-and-Continue.
//!
//! The map records, per method, every lambda or local function by its defining syntax
//! offset, and every synthesized closure likewise. Capture relationships are expressed
//! as an index into the closure list, resolved here from defining offsets. Offsets are
//! stable across recompilation of unchanged source while synthesized display-class
//! names are not, which is why the map never stores a name.

use crate::lowered::MethodInput;
use crate::records::customdebuginfo::{ClosureMapEntry, CustomDebugInfo, LambdaMapEntry};
use crate::Result;

/// Builds the lambda/closure map of one method.
pub struct LambdaClosureMapper;

impl LambdaClosureMapper {
    /// Build the map for `input`. Returns `None` when the method defines no lambdas
    /// and no closures.
    ///
    /// Both lists come out ordered by defining syntax offset, so the record is
    /// independent of the order upstream lowering discovered the symbols in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvariantViolation`] when a lambda references a closure
    /// offset that matches no closure in the method.
    pub fn map(input: &MethodInput) -> Result<Option<CustomDebugInfo>> {
        if input.symbols.lambdas.is_empty() && input.symbols.closures.is_empty() {
            return Ok(None);
        }

        let mut closures: Vec<ClosureMapEntry> = input
            .symbols
            .closures
            .iter()
            .map(|closure| ClosureMapEntry {
                syntax_offset: closure.syntax_offset,
            })
            .collect();
        closures.sort_by_key(|entry| entry.syntax_offset);

        let mut lambdas: Vec<LambdaMapEntry> = Vec::with_capacity(input.symbols.lambdas.len());
        for lambda in &input.symbols.lambdas {
            let closure_ordinal = match lambda.closure {
                Some(offset) => {
                    let ordinal = closures
                        .iter()
                        .position(|closure| closure.syntax_offset == offset)
                        .ok_or_else(|| {
                            invariant_error!(
                                "lambda at {} in {} captures through closure {} which does not exist",
                                lambda.syntax_offset,
                                input.id,
                                offset
                            )
                        })?;
                    Some(ordinal as u32)
                }
                None => None,
            };
            lambdas.push(LambdaMapEntry {
                syntax_offset: lambda.syntax_offset,
                closure_ordinal,
            });
        }
        lambdas.sort_by_key(|entry| entry.syntax_offset);

        Ok(Some(CustomDebugInfo::EncLambdaMap { lambdas, closures }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowered::span::SyntaxOffset;
    use crate::lowered::symbols::{ClosureSymbol, LambdaSymbol};
    use crate::records::document::DocumentId;
    use crate::records::method::MethodId;

    fn input() -> MethodInput {
        MethodInput::new(MethodId(6), DocumentId(0), 0x30)
    }

    fn unwrap_map(record: CustomDebugInfo) -> (Vec<LambdaMapEntry>, Vec<ClosureMapEntry>) {
        match record {
            CustomDebugInfo::EncLambdaMap { lambdas, closures } => (lambdas, closures),
            other => panic!("expected lambda map, got {:?}", other.kind()),
        }
    }

    #[test]
    fn no_lambdas_no_record() {
        assert!(LambdaClosureMapper::map(&input()).unwrap().is_none());
    }

    #[test]
    fn entries_are_sorted_by_syntax_offset() {
        let mut input = input();
        input.symbols.lambdas.push(LambdaSymbol {
            syntax_offset: SyntaxOffset(90),
            closure: None,
        });
        input.symbols.lambdas.push(LambdaSymbol {
            syntax_offset: SyntaxOffset(40),
            closure: None,
        });

        let (lambdas, closures) =
            unwrap_map(LambdaClosureMapper::map(&input).unwrap().unwrap());
        assert!(closures.is_empty());
        assert_eq!(lambdas[0].syntax_offset, SyntaxOffset(40));
        assert_eq!(lambdas[1].syntax_offset, SyntaxOffset(90));
    }

    #[test]
    fn capture_resolves_to_closure_ordinal() {
        let mut input = input();
        input.symbols.closures.push(ClosureSymbol {
            syntax_offset: SyntaxOffset(60),
        });
        input.symbols.closures.push(ClosureSymbol {
            syntax_offset: SyntaxOffset(10),
        });
        input.symbols.lambdas.push(LambdaSymbol {
            syntax_offset: SyntaxOffset(70),
            closure: Some(SyntaxOffset(60)),
        });

        let (lambdas, closures) =
            unwrap_map(LambdaClosureMapper::map(&input).unwrap().unwrap());
        // Closures sort by offset, so offset 60 lands at ordinal 1.
        assert_eq!(closures[0].syntax_offset, SyntaxOffset(10));
        assert_eq!(lambdas[0].closure_ordinal, Some(1));
    }

    #[test]
    fn unresolved_capture_is_an_invariant_violation() {
        let mut input = input();
        input.symbols.lambdas.push(LambdaSymbol {
            syntax_offset: SyntaxOffset(70),
            closure: Some(SyntaxOffset(99)),
        });
        let err = LambdaClosureMapper::map(&input).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
