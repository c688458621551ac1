//! Cryptographic primitives for formid
//!
//! This module provides the cryptographic foundation for the identity model:
//!
//! - **Identity & Signing**: Ed25519 keypairs back every mutable pointer.
//!   The public half derives the pointer's stable name; the private half
//!   signs every published record.
//! - **Key Wrapping**: ChaCha20-Poly1305 AEAD encrypts the pointer's
//!   private key for the recovery vault.
//!
//! # Security Model
//!
//! ## Pointer Identity
//! Each identity is an Ed25519 keypair (`SecretKey`/`PublicKey`). The name
//! is derived from the public key alone, so creating an identity requires
//! no registry or network round trip.
//!
//! ## Key Recovery
//! The private key never leaves the device in the clear. For multi-device
//! access it is wrapped under a `Secret` derived from a deterministic
//! wallet signature (see [`crate::vault`]) and stored as an opaque blob in
//! the content store.

mod keys;
mod secret;

pub use ed25519_dalek::Signature;
pub use keys::{KeyError, PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use secret::{Secret, SecretError, SECRET_SIZE};
