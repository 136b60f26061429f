//! Bundled hart tests.
//!
//! Small hand-assembled RV32 programs are loaded into RAM and stepped; the
//! tests then observe registers, CSRs, and memory. Encodings were checked
//! against a reference assembler.

use rvmach_core::common::constants::RAM_BASE;
use rvmach_core::core::{ExecutionCore, IrqLines};
use rvmach_core::{Hart, Machine};

use crate::common::null_machine;

const DTB_PTR: u32 = 0x8200_0000;

/// Loads the words as firmware and returns a reset hart plus the machine.
fn boot(words: &[u32], ram_size: usize) -> (Hart, Machine) {
    let mut image = Vec::with_capacity(words.len() * 4);
    for w in words {
        image.extend_from_slice(&w.to_le_bytes());
    }
    let mut machine = null_machine(ram_size);
    let _ = machine.load_firmware(&image);

    let mut hart = Hart::new();
    hart.reset(RAM_BASE, 0, DTB_PTR);
    (hart, machine)
}

fn step_n(hart: &mut Hart, machine: &mut Machine, n: usize) {
    for _ in 0..n {
        hart.step(machine.bus_mut());
    }
}

#[test]
fn reset_applies_the_boot_convention() {
    let (hart, _machine) = boot(&[], 4096);
    assert_eq!(hart.pc(), RAM_BASE);
    assert_eq!(hart.reg(10), 0, "a0 carries the hart id");
    assert_eq!(hart.reg(11), DTB_PTR, "a1 carries the device-tree pointer");
    assert_eq!(hart.csr.mhartid, 0);
}

#[test]
fn arithmetic_store_load_sequence() {
    let program = [
        0x02A00513, // li   a0, 42
        0x800005B7, // lui  a1, 0x80000
        0x10058593, // addi a1, a1, 0x100
        0x00A5A023, // sw   a0, 0(a1)
        0x0005A603, // lw   a2, 0(a1)
        0x00C50633, // add  a2, a0, a2
        0x0000006F, // j    .
    ];
    let (mut hart, mut machine) = boot(&program, 64 * 1024);

    step_n(&mut hart, &mut machine, 7);

    assert_eq!(hart.reg(10), 42);
    assert_eq!(hart.reg(12), 84);
    assert_eq!(machine.bus().ram().slice(0x100, 4), &42u32.to_le_bytes()[..]);
    assert_eq!(hart.pc(), RAM_BASE + 0x18, "parked on the self-jump");
}

#[test]
fn taken_branch_skips_the_fallthrough() {
    let program = [
        0x00500513, // li  a0, 5
        0x00500593, // li  a1, 5
        0x00B50463, // beq a0, a1, +8
        0x00100613, // li  a2, 1   (skipped)
        0x00700693, // li  a3, 7
    ];
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 4);

    assert_eq!(hart.reg(12), 0);
    assert_eq!(hart.reg(13), 7);
    assert_eq!(hart.pc(), RAM_BASE + 0x14);
}

#[test]
fn logical_and_arithmetic_shifts_differ_on_sign() {
    let program = [
        0xFFF00293, // li   t0, -1
        0x0042D313, // srli t1, t0, 4
        0x4042D393, // srai t2, t0, 4
    ];
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 3);

    assert_eq!(hart.reg(6), 0x0FFF_FFFF);
    assert_eq!(hart.reg(7), 0xFFFF_FFFF);
}

#[test]
fn signed_multiply_divide_remainder() {
    let program = [
        0x00700513, // li  a0, 7
        0xFFD00593, // li  a1, -3
        0x02B50633, // mul a2, a0, a1
        0x02B546B3, // div a3, a0, a1
        0x02B56733, // rem a4, a0, a1
    ];
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 5);

    assert_eq!(hart.reg(12) as i32, -21);
    assert_eq!(hart.reg(13) as i32, -2, "division truncates toward zero");
    assert_eq!(hart.reg(14) as i32, 1);
}

#[test]
fn csr_set_and_clear_operate_on_mscratch() {
    let program = [
        0x0FF00293, // li    t0, 0xFF
        0x34029073, // csrw  mscratch, t0
        0x34002373, // csrr  t1, mscratch
        0x00F00393, // li    t2, 0x0F
        0x3403B073, // csrc  mscratch, t2
        0x34002E73, // csrr  t3, mscratch
    ];
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 6);

    assert_eq!(hart.reg(6), 0xFF);
    assert_eq!(hart.reg(28), 0xF0);
}

#[test]
fn ecall_traps_and_mret_returns_past_it() {
    let mut program = vec![
        0x80000337, // lui  t1, 0x80000
        0x04030313, // addi t1, t1, 0x40
        0x30531073, // csrw mtvec, t1
        0x00000073, // ecall
        0x00100413, // li   s0, 1   (runs after mret)
        0x0000006F, // j    .
    ];
    program.resize(0x40 / 4, 0);
    program.extend([
        0x342023F3, // csrr t2, mcause
        0x34102E73, // csrr t3, mepc
        0x004E0E13, // addi t3, t3, 4
        0x341E1073, // csrw mepc, t3
        0x30200073, // mret
    ]);
    let (mut hart, mut machine) = boot(&program, 4096);

    // Setup plus the ecall itself.
    step_n(&mut hart, &mut machine, 4);
    assert_eq!(hart.pc(), RAM_BASE + 0x40, "redirected to the handler");
    assert_eq!(hart.csr.mcause, 11, "environment call from machine mode");
    assert_eq!(hart.csr.mepc, RAM_BASE + 0x0C);

    // Handler body and return.
    step_n(&mut hart, &mut machine, 5);
    assert_eq!(hart.pc(), RAM_BASE + 0x10);
    assert_eq!(hart.reg(7), 11);

    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.reg(8), 1);
}

#[test]
fn delivered_interrupt_enters_the_vector_and_mret_restores_state() {
    let mut program = vec![
        0x80000337, // lui  t1, 0x80000
        0x04030313, // addi t1, t1, 0x40
        0x30531073, // csrw mtvec, t1
        0x08000293, // li   t0, 0x80
        0x30429073, // csrw mie, t0
        0x00800293, // li   t0, 8
        0x30029073, // csrw mstatus, t0
        0x0000006F, // j    .
    ];
    program.resize(0x40 / 4, 0);
    program.push(0x30200073); // mret
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 7);
    hart.set_interrupts(IrqLines::TIMER);

    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.pc(), RAM_BASE + 0x40);
    assert_eq!(hart.csr.mcause, 0x8000_0007);
    assert_eq!(hart.csr.mepc, RAM_BASE + 0x1C);
    assert_eq!(hart.csr.mstatus & 0x8, 0, "MIE stacked away");

    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.pc(), RAM_BASE + 0x1C, "mret returned to the loop");
    assert_ne!(hart.csr.mstatus & 0x8, 0, "MIE restored");
}

#[test]
fn lowered_lines_are_idempotent_and_clear_pending() {
    let (mut hart, _machine) = boot(&[], 4096);
    hart.set_interrupts(IrqLines::TIMER | IrqLines::SOFTWARE);
    assert_eq!(hart.csr.mip, IrqLines::TIMER.bits() | IrqLines::SOFTWARE.bits());

    hart.set_interrupts(IrqLines::NONE);
    assert_eq!(hart.csr.mip, 0);
}

#[test]
fn bus_fault_becomes_a_load_access_fault_trap() {
    // a1 points at the device-tree address, far outside this 64 KiB RAM.
    let program = [
        0x0005A603, // lw a2, 0(a1)
    ];
    let (mut hart, mut machine) = boot(&program, 64 * 1024);

    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.csr.mcause, 5);
    assert_eq!(hart.csr.mtval, DTB_PTR);
    assert_eq!(hart.pc(), 0, "mtvec is still zero");

    // The next step fetches from the unmapped vector and keeps trapping;
    // the loop itself never aborts.
    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.csr.mcause, 1);
}

#[test]
fn wfi_stalls_until_an_enabled_interrupt_is_pending() {
    let program = [
        0x08000293, // li   t0, 0x80
        0x30429073, // csrw mie, t0
        0x10500073, // wfi
        0x00100513, // li   a0, 1
    ];
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 3);
    assert_eq!(hart.pc(), RAM_BASE + 0x0C);

    // Stalled: steps make no progress while nothing is pending.
    step_n(&mut hart, &mut machine, 3);
    assert_eq!(hart.reg(10), 0);

    // A pending enabled interrupt resumes execution; with the global enable
    // clear it is not taken, execution just continues.
    hart.set_interrupts(IrqLines::TIMER);
    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.reg(10), 1);
    assert_eq!(hart.pc(), RAM_BASE + 0x10);
}

#[test]
fn illegal_instruction_traps_with_the_encoding_in_mtval() {
    let program = [
        0xFFFF_FFFF, // not a valid RV32 encoding
    ];
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.csr.mcause, 2);
    assert_eq!(hart.csr.mtval, 0xFFFF_FFFF);
}

#[test]
fn compressed_encodings_are_rejected() {
    let program = [
        0x0000_4501, // would be c.li a0, 0 on an RVC hart
    ];
    let (mut hart, mut machine) = boot(&program, 4096);

    step_n(&mut hart, &mut machine, 1);
    assert_eq!(hart.csr.mcause, 2, "IALIGN=32: no compressed support");
}
