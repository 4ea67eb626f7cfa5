// Expiry evaluation - extraction of valid-until instants and the window policy
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

pub mod extractor;
pub mod policy;

pub use extractor::{
    ASSUMED_KEYTAB_VALIDITY_SECS, CredentialExpiry, ExpiryExtractor, MAX_LOOKAHEAD_SECS,
};
pub use policy::{Verdict, evaluate, evaluate_keytab};
