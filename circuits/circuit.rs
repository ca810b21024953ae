//! Murkl withdrawal circuit
//!
//! Proves knowledge of a deposit in the commitment tree without revealing
//! which leaf it is:
//! - `H(secret)` is the leaf at `address` under `root`
//! - `H(address, secret) = nullifier`
//! - `H(root, nullifier, exthash) = public digest`
//!
//! Public inputs:
//! - Public digest (the only instance variable besides `one`)
//!
//! Private inputs:
//! - Root and external context hash (bound to the digest by a hash)
//! - Secret
//! - Merkle path (siblings) and address bits
//!
//! The same [`WithdrawCircuit`] value serves key generation (blank, setup
//! mode) and proving (assigned via [`WithdrawCircuit::assign`]). The shape
//! depends only on the tree depth.

use ark_bn254::Fr;
use ark_ff::{AdditiveGroup, Field};
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::{AllocatedFp, FpVar};
use ark_relations::r1cs::{
    ConstraintMatrices, ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef,
    SynthesisError, SynthesisMode,
};

use crate::config::CircuitConfig;
use crate::error::{CircuitError, InputError, Result};
use crate::gadgets::bits::AddressBitsGadget;
use crate::gadgets::{self, merkle, mimc};
use crate::nullifier::{leaf_commitment, nullifier, public_digest};
use crate::params::HashParams;

// ============================================================================
// Inputs and shape
// ============================================================================

/// Concrete values for one withdrawal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawInputs {
    /// Merkle root the proof is made against
    pub root: Fr,
    /// External context hash supplied by the calling contract
    pub exthash: Fr,
    /// Deposit secret
    pub secret: Fr,
    /// Leaf position, little-endian
    pub address_bits: Vec<bool>,
    /// Sibling at each level, leaf to root
    pub path: Vec<Fr>,
}

impl WithdrawInputs {
    /// Build inputs from an integer leaf address; depth is the path length
    pub fn from_address(
        root: Fr,
        exthash: Fr,
        secret: Fr,
        address: u64,
        path: Vec<Fr>,
    ) -> core::result::Result<Self, InputError> {
        let address_bits = crate::codec::address_bits_from_index(address, path.len())?;
        Ok(Self { root, exthash, secret, address_bits, path })
    }
}

/// Size of the compiled circuit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircuitShape {
    pub depth: usize,
    pub constraints: usize,
    /// Public inputs, excluding the constant `one`
    pub public_inputs: usize,
    pub private_variables: usize,
}

#[derive(Clone, Debug)]
struct Assignment {
    digest: Fr,
    inputs: WithdrawInputs,
}

/// Constraint index ranges labelled by the step that emitted them
#[derive(Debug, Default)]
struct Sections(Vec<(usize, String)>);

impl Sections {
    fn mark(&mut self, cs: &ConstraintSystemRef<Fr>, label: impl Into<String>) {
        self.0.push((cs.num_constraints(), label.into()));
    }

    fn locate(&self, index: usize) -> String {
        let label = self
            .0
            .iter()
            .rev()
            .find(|(start, _)| *start <= index)
            .map_or("unlabelled", |(_, label)| label.as_str());
        format!("{} (constraint #{})", label, index)
    }
}

// ============================================================================
// Circuit
// ============================================================================

/// The withdrawal statement for one tree depth
#[derive(Clone, Debug)]
pub struct WithdrawCircuit {
    params: &'static HashParams,
    config: CircuitConfig,
    label: String,
    assignment: Option<Assignment>,
}

impl WithdrawCircuit {
    /// A blank circuit, used for key generation
    pub fn new(params: &'static HashParams, config: CircuitConfig, label: impl Into<String>) -> Self {
        Self {
            params,
            config,
            label: label.into(),
            assignment: None,
        }
    }

    pub fn depth(&self) -> usize {
        self.config.tree_depth
    }

    pub fn config(&self) -> CircuitConfig {
        self.config
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this circuit carries witness values
    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// Synthesize without values and report the circuit size
    pub fn shape(&self) -> Result<CircuitShape> {
        let cs = self.setup_system()?;
        Ok(CircuitShape {
            depth: self.depth(),
            constraints: cs.num_constraints(),
            public_inputs: cs.num_instance_variables() - 1,
            private_variables: cs.num_witness_variables(),
        })
    }

    /// Synthesize without values and return the R1CS matrices
    pub fn constraint_matrices(&self) -> Result<ConstraintMatrices<Fr>> {
        let cs = self.setup_system()?;
        cs.finalize();
        cs.to_matrices().ok_or_else(|| {
            CircuitError::InternalInvariantViolation("setup mode did not build matrices".into())
        })
    }

    fn setup_system(&self) -> Result<ConstraintSystemRef<Fr>> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(SynthesisMode::Setup);
        self.synthesize(&cs)?;
        Ok(cs)
    }

    /// Compute every intermediate value for `inputs` and check them against
    /// the constraints.
    ///
    /// Length mismatches are rejected before any hashing. A well-formed but
    /// inconsistent request (wrong path, secret or address) yields
    /// [`CircuitError::WitnessMismatch`] naming the first failing constraint.
    pub fn assign(&self, inputs: WithdrawInputs) -> Result<Witness> {
        let depth = self.depth();
        if inputs.path.len() != depth {
            return Err(InputError::PathLengthMismatch {
                expected: depth,
                actual: inputs.path.len(),
            }
            .into());
        }
        if inputs.address_bits.len() != depth {
            return Err(InputError::AddressLengthMismatch {
                expected: depth,
                actual: inputs.address_bits.len(),
            }
            .into());
        }

        let params = self.params;
        let leaf = leaf_commitment(params, inputs.secret);
        let nullifier = nullifier(params, inputs.secret, &inputs.address_bits);
        let digest = public_digest(params, inputs.root, nullifier, inputs.exthash);
        let root = inputs.root;

        let circuit = Self {
            assignment: Some(Assignment { digest, inputs }),
            ..self.clone()
        };

        let cs = ConstraintSystem::<Fr>::new_ref();
        let sections = circuit.synthesize(&cs)?;
        cs.finalize();

        if let Some(index) = first_unsatisfied(&cs)? {
            let constraint = sections.locate(index);
            tracing::warn!(label = %self.label, %constraint, "witness does not satisfy the circuit");
            return Err(CircuitError::WitnessMismatch { constraint });
        }

        let (instance, witness) = {
            let inner = cs.borrow().ok_or_else(|| {
                CircuitError::InternalInvariantViolation("constraint system dropped".into())
            })?;
            (inner.instance_assignment.clone(), inner.witness_assignment.clone())
        };
        if instance != [Fr::ONE, digest] {
            return Err(CircuitError::InternalInvariantViolation(
                "public inputs do not match the computed digest".into(),
            ));
        }

        Ok(Witness {
            num_constraints: cs.num_constraints(),
            circuit,
            public_digest: digest,
            nullifier,
            leaf,
            root,
            instance,
            witness,
        })
    }

    /// Emit the withdrawal constraints into `cs`
    fn synthesize(&self, cs: &ConstraintSystemRef<Fr>) -> core::result::Result<Sections, SynthesisError> {
        let depth = self.depth();
        let span = tracing::debug_span!("withdraw_circuit", label = %self.label, depth);
        let _enter = span.enter();

        let params = self.params;
        let a = self.assignment.as_ref();
        let mut sections = Sections::default();

        // 1. Variables
        let digest = gadgets::input(cs, a.map(|a| a.digest))?;
        let root = gadgets::witness(cs, a.map(|a| a.inputs.root))?;
        let exthash = gadgets::witness(cs, a.map(|a| a.inputs.exthash))?;
        let secret = gadgets::witness(cs, a.map(|a| a.inputs.secret))?;
        let path = (0..depth)
            .map(|i| gadgets::witness(cs, a.map(|a| a.inputs.path[i])))
            .collect::<core::result::Result<Vec<_>, _>>()?;

        // 2. Address bits, boolean and packed
        sections.mark(cs, "address bits");
        let address = AddressBitsGadget::alloc(cs, depth, a.map(|a| a.inputs.address_bits.as_slice()))?;
        let zero = AllocatedFp::new_witness(cs.clone(), || {
            a.map(|_| Fr::ZERO).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let iv0 = FpVar::Var(zero.clone());

        // 3. nullifier = H(0, [address, secret])
        sections.mark(cs, "nullifier");
        let nullifier = mimc::hash(params, &iv0, &[address.packed().clone(), secret.clone()])?;

        // 4. digest = H(0, [root, nullifier, exthash])
        sections.mark(cs, "public digest");
        let candidate = mimc::hash(params, &iv0, &[root.clone(), nullifier, exthash])?;
        candidate.enforce_equal(&digest)?;

        // 5. zero * zero = zero - zero
        sections.mark(cs, "zero constant");
        gadgets::enforce_zero(cs, &zero)?;

        // 6. leaf = H(0, [secret])
        sections.mark(cs, "leaf commitment");
        let leaf = mimc::hash(params, &iv0, &[secret])?;

        // 7. Merkle authentication
        let mut current = leaf;
        for (level, (sibling, bit)) in path.iter().zip(address.bits()).enumerate() {
            sections.mark(cs, format!("merkle level {}", level));
            current = merkle::level(params, level, &current, sibling, bit)?;
        }
        sections.mark(cs, "merkle root");
        current.enforce_equal(&root)?;

        tracing::debug!(
            constraints = cs.num_constraints(),
            witnesses = cs.num_witness_variables(),
            "withdraw circuit synthesized"
        );
        Ok(sections)
    }
}

impl ConstraintSynthesizer<Fr> for WithdrawCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> core::result::Result<(), SynthesisError> {
        self.synthesize(&cs).map(|_| ())
    }
}

/// Index of the first constraint `a * b = c` that the assignment violates
fn first_unsatisfied(cs: &ConstraintSystemRef<Fr>) -> Result<Option<usize>> {
    let matrices = cs.to_matrices().ok_or_else(|| {
        CircuitError::InternalInvariantViolation("constraint matrices unavailable".into())
    })?;
    let inner = cs.borrow().ok_or_else(|| {
        CircuitError::InternalInvariantViolation("constraint system dropped".into())
    })?;

    let z: Vec<Fr> = inner
        .instance_assignment
        .iter()
        .chain(&inner.witness_assignment)
        .copied()
        .collect();
    if z.len() != matrices.num_instance_variables + matrices.num_witness_variables {
        return Err(CircuitError::InternalInvariantViolation(format!(
            "assignment has {} values for {} variables",
            z.len(),
            matrices.num_instance_variables + matrices.num_witness_variables
        )));
    }

    let eval = |row: &Vec<(Fr, usize)>| row.iter().map(|&(coeff, col)| coeff * z[col]).sum::<Fr>();
    Ok(matrices
        .a
        .iter()
        .zip(&matrices.b)
        .zip(&matrices.c)
        .position(|((a, b), c)| eval(a) * eval(b) != eval(c)))
}

// ============================================================================
// Witness
// ============================================================================

/// A satisfying assignment for one withdrawal
#[derive(Clone, Debug)]
pub struct Witness {
    circuit: WithdrawCircuit,
    public_digest: Fr,
    nullifier: Fr,
    leaf: Fr,
    root: Fr,
    instance: Vec<Fr>,
    witness: Vec<Fr>,
    num_constraints: usize,
}

impl Witness {
    /// The single public input
    pub fn public_digest(&self) -> Fr {
        self.public_digest
    }

    pub fn nullifier(&self) -> Fr {
        self.nullifier
    }

    pub fn leaf(&self) -> Fr {
        self.leaf
    }

    pub fn root(&self) -> Fr {
        self.root
    }

    /// Public inputs in verifier order
    pub fn public_inputs(&self) -> Vec<Fr> {
        vec![self.public_digest]
    }

    /// Full variable assignment: (instance including `one`, witness)
    pub fn assignment(&self) -> (&[Fr], &[Fr]) {
        (&self.instance, &self.witness)
    }

    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    pub fn depth(&self) -> usize {
        self.circuit.depth()
    }

    /// The assigned circuit, ready for the prover
    pub fn into_circuit(self) -> WithdrawCircuit {
        self.circuit
    }
}
