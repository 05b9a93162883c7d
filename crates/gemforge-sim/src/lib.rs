// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GemForge.

//! Command-line front end for the GemForge optimizer.

pub mod cli;
