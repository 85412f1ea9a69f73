//! Edge case tests for uxf-lex
