//! The TISC interpreter.
//!
//! [`Interpreter`] owns a program, its machine state and an authorization
//! hook. Each [`Interpreter::step`] fetches the instruction at `pc`, checks
//! every operand, and only then mutates state, so a fault leaves registers,
//! stack, memory and flags exactly as they were with `pc` still on the
//! faulting instruction.
//!
//! Running off the end of the program halts the machine without a trace
//! entry.

use tisc_core::{Fault, Insn, OpCode, Program};
use tracing::{debug, trace, warn};

use crate::VmConfig;
use crate::auth::{AllowAll, AuthContext, AuthorizationHook};
use crate::state::{AuthorizationRecord, ConditionFlags, MachineStatus, TraceEntry, VmState};

type Result<T> = std::result::Result<T, Fault>;

/// What a successful step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Another instruction can be fetched.
    Continue,
    /// The machine is halted.
    Halted,
}

/// How a bounded run ended without faulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Halted,
    /// The step budget ran out first.
    BudgetExhausted,
}

/// Where control goes after an instruction.
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// Executes one program on one machine.
pub struct Interpreter {
    program: Program,
    config: VmConfig,
    hook: Box<dyn AuthorizationHook>,
    state: VmState,
}

impl Interpreter {
    /// A fresh machine with the default configuration and the allow-all
    /// policy.
    pub fn new(program: Program) -> Self {
        let config = VmConfig::default();
        Self {
            state: VmState::new(&config),
            program,
            config,
            hook: Box::new(AllowAll),
        }
    }

    /// Replace the configuration. The machine is reset.
    pub fn with_config(mut self, config: VmConfig) -> Self {
        self.config = config;
        self.state = VmState::new(&config);
        self
    }

    /// Replace the authorization hook.
    pub fn with_hook(mut self, hook: impl AuthorizationHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn state(&self) -> &VmState {
        &self.state
    }

    pub fn into_state(self) -> VmState {
        self.state
    }

    /// Discard all state and start over from `pc` 0. The hook is kept.
    pub fn reset(&mut self) {
        self.state = VmState::new(&self.config);
    }

    // ==========================================================================
    // Execution
    // ==========================================================================

    /// Execute one instruction.
    ///
    /// A halted machine stays halted and a faulted one keeps returning its
    /// fault; neither records a trace entry.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.state.status {
            MachineStatus::Halted => return Ok(StepOutcome::Halted),
            MachineStatus::Faulted(fault) => return Err(fault),
            MachineStatus::Ready | MachineStatus::Running => {}
        }

        let pc = self.state.pc;
        let Some(&insn) = self.program.get(pc) else {
            debug!(pc, "ran off end of program");
            self.state.status = MachineStatus::Halted;
            return Ok(StepOutcome::Halted);
        };
        self.state.status = MachineStatus::Running;
        trace!(pc, %insn, "step");

        match self.execute(pc, &insn) {
            Ok(flow) => {
                self.state.trace.push(TraceEntry {
                    pc,
                    insn,
                    fault: None,
                });
                match flow {
                    Flow::Next => self.state.pc = pc + 1,
                    Flow::Jump(target) => self.state.pc = target,
                    Flow::Halt => {
                        self.state.status = MachineStatus::Halted;
                        return Ok(StepOutcome::Halted);
                    }
                }
                Ok(StepOutcome::Continue)
            }
            Err(fault) => {
                warn!(pc, %insn, %fault, "machine faulted");
                self.state.trace.push(TraceEntry {
                    pc,
                    insn,
                    fault: Some(fault),
                });
                self.state.status = MachineStatus::Faulted(fault);
                Err(fault)
            }
        }
    }

    /// Step until the machine halts or faults. There is no step limit.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run_to_halt(&mut self) -> Result<()> {
        while self.step()? == StepOutcome::Continue {}
        Ok(())
    }

    /// Step until the machine halts, faults, or `max_steps` instructions
    /// have executed.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run_bounded(&mut self, max_steps: usize) -> Result<RunOutcome> {
        for _ in 0..max_steps {
            if self.step()? == StepOutcome::Halted {
                return Ok(RunOutcome::Halted);
            }
        }
        if self.state.is_halted() {
            Ok(RunOutcome::Halted)
        } else {
            debug!(max_steps, pc = self.state.pc, "step budget exhausted");
            Ok(RunOutcome::BudgetExhausted)
        }
    }

    fn execute(&mut self, pc: usize, insn: &Insn) -> Result<Flow> {
        match insn.opcode {
            OpCode::Nop => {}
            OpCode::Halt => return Ok(Flow::Halt),

            OpCode::LoadImm => {
                let dst = reg(insn.a)?;
                self.state.write(dst, insn.imm);
            }
            OpCode::Load => {
                let dst = reg(insn.a)?;
                let addr = self.address(insn.imm)?;
                let value = self.state.memory[addr];
                self.state.write(dst, value);
            }
            OpCode::Store => {
                let src = reg(insn.a)?;
                let addr = self.address(insn.imm)?;
                self.state.memory[addr] = self.state.registers[src];
            }

            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Mod => {
                let dst = reg(insn.a)?;
                let lhs = self.state.registers[reg(insn.b)?];
                let rhs = self.state.registers[reg(insn.c)?];
                let value = match insn.opcode {
                    OpCode::Add => lhs.wrapping_add(rhs),
                    OpCode::Sub => lhs.wrapping_sub(rhs),
                    OpCode::Mul => lhs.wrapping_mul(rhs),
                    _ if rhs == 0 => return Err(Fault::DivideByZero),
                    OpCode::Div => lhs.wrapping_div(rhs),
                    _ => lhs.wrapping_rem(rhs),
                };
                self.state.write(dst, value);
            }
            OpCode::Neg => {
                let dst = reg(insn.a)?;
                let value = self.state.registers[reg(insn.b)?].wrapping_neg();
                self.state.write(dst, value);
            }
            OpCode::Inc | OpCode::Dec => {
                let r = reg(insn.a)?;
                let delta = if insn.opcode == OpCode::Inc { 1 } else { -1 };
                let value = self.state.registers[r].wrapping_add(delta);
                self.state.write(r, value);
            }
            OpCode::Mov => {
                let dst = reg(insn.a)?;
                let value = self.state.registers[reg(insn.b)?];
                self.state.write(dst, value);
            }
            OpCode::Cmp => {
                let lhs = self.state.registers[reg(insn.a)?];
                let rhs = self.state.registers[reg(insn.b)?];
                let mut flags = ConditionFlags::empty();
                flags.set(ConditionFlags::ZERO, lhs == rhs);
                flags.set(ConditionFlags::NEGATIVE, lhs < rhs);
                self.state.flags = flags;
            }

            OpCode::Push => {
                let value = self.state.registers[reg(insn.a)?];
                self.push(value)?;
            }
            OpCode::Pop => {
                let dst = reg(insn.a)?;
                let value = self.state.stack.pop().ok_or(Fault::BoundsFault)?;
                self.state.registers[dst] = value;
            }

            OpCode::Jump => return Ok(Flow::Jump(self.target(insn.imm)?)),
            OpCode::JumpIfZero => {
                if self.state.registers[reg(insn.a)?] == 0 {
                    return Ok(Flow::Jump(self.target(insn.imm)?));
                }
            }
            OpCode::JumpIfNotZero => {
                if self.state.registers[reg(insn.a)?] != 0 {
                    return Ok(Flow::Jump(self.target(insn.imm)?));
                }
            }
            OpCode::JumpIfNegative => {
                if self.state.flags.contains(ConditionFlags::NEGATIVE) {
                    return Ok(Flow::Jump(self.target(insn.imm)?));
                }
            }

            OpCode::Call => {
                let target = self.target(self.state.registers[reg(insn.a)?])?;
                self.push((pc + 1) as i64)?;
                return Ok(Flow::Jump(target));
            }
            OpCode::Ret => {
                let &addr = self.state.stack.last().ok_or(Fault::BoundsFault)?;
                let target = self.target(addr)?;
                self.state.stack.pop();
                return Ok(Flow::Jump(target));
            }

            OpCode::Trap => return Err(Fault::TrapInstruction),

            OpCode::AxRead | OpCode::AxSet | OpCode::AxVerify => {
                self.privileged(pc, insn)?;
            }
        }
        Ok(Flow::Next)
    }

    /// Submit a privileged instruction to the hook and perform it if allowed.
    fn privileged(&mut self, pc: usize, insn: &Insn) -> Result<()> {
        let r = reg(insn.a)?;
        let value = match insn.opcode {
            OpCode::AxRead => insn.imm,
            OpCode::AxSet => self.state.registers[r],
            _ => 0,
        };
        let context = AuthContext {
            pc,
            opcode: insn.opcode,
            operand: insn.a,
            tag: insn.imm,
            value,
        };

        let verdict = self.hook.evaluate(&context);
        let allowed = verdict.is_allowed();
        if !allowed {
            debug!(
                pc,
                opcode = insn.opcode.name(),
                reason = verdict.reason.as_deref().unwrap_or(""),
                "privileged instruction denied"
            );
        }
        self.state.auth_log.push(AuthorizationRecord {
            pc,
            opcode: insn.opcode,
            tag: insn.imm,
            value,
            verdict,
        });
        if !allowed {
            return Err(Fault::SecurityFault);
        }

        // AxSet's effect is the authorized, logged publication of the value.
        if insn.opcode != OpCode::AxSet {
            self.state.registers[r] = value;
        }
        Ok(())
    }

    fn push(&mut self, value: i64) -> Result<()> {
        if self.state.stack.len() >= self.config.max_stack_depth {
            return Err(Fault::BoundsFault);
        }
        self.state.stack.push(value);
        Ok(())
    }

    fn target(&self, target: i64) -> Result<usize> {
        if self.program.contains_offset(target) {
            Ok(target as usize)
        } else {
            Err(Fault::IllegalInstruction)
        }
    }

    fn address(&self, address: i64) -> Result<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&a| a < self.state.memory.len())
            .ok_or(Fault::InvalidMemory)
    }
}

/// Index of a register operand.
fn reg(operand: u32) -> Result<usize> {
    let index = operand as usize;
    if index < tisc_core::REGISTER_COUNT {
        Ok(index)
    } else {
        Err(Fault::IllegalInstruction)
    }
}
