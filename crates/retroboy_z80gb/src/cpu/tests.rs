use rand::Rng;

use super::cycles::INTERRUPT_CYCLES;
use super::*;
use crate::config::CpuConfig;
use crate::error::CoreError;

struct TestBus {
    memory: [u8; 0x10000],
    acknowledged: Vec<u8>,
    pc_changes: Vec<u16>,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
            acknowledged: Vec::new(),
            pc_changes: Vec::new(),
        }
    }
}

impl TestBus {
    fn load(&mut self, addr: u16, program: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    fn acknowledge_interrupt(&mut self, line: u8) -> i32 {
        self.acknowledged.push(line);
        0
    }

    fn pc_changed(&mut self, pc: u16) {
        self.pc_changes.push(pc);
    }
}

fn cpu_at(pc: u16) -> Cpu {
    let mut cpu = Cpu::new();
    cpu.set_pc(pc);
    cpu
}

#[test]
fn power_on_registers() {
    let cpu = Cpu::new();
    assert_eq!(cpu.get_register(Reg::Af), 0x01B0);
    assert_eq!(cpu.get_register(Reg::Bc), 0x0013);
    assert_eq!(cpu.get_register(Reg::De), 0x00D8);
    assert_eq!(cpu.get_register(Reg::Hl), 0x014D);
    assert_eq!(cpu.sp(), 0xFFFE);
    assert_eq!(cpu.pc(), 0x0100);
    assert!(!cpu.ime());
    assert!(!cpu.halted());
}

#[test]
fn reset_restores_power_on_state_and_is_idempotent() {
    let mut cpu = Cpu::new();
    let power_on = cpu.snapshot();

    cpu.set_register(Reg::Bc, 0xDEAD);
    cpu.set_register(Reg::Sp, 0x1234);
    cpu.set_pc(0x4000);
    cpu.set_ime(true);
    cpu.timer_mut().write_tac(0x05);
    cpu.request_interrupt(InterruptLine::Serial);

    cpu.reset();
    assert_eq!(cpu.snapshot(), power_on);
    cpu.reset();
    assert_eq!(cpu.snapshot(), power_on);
}

#[test]
fn nop_advances_pc() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // 0x00: NOP
    bus.memory[0x0000] = 0x00;

    let cycles = cpu.step(&mut bus);

    assert_eq!(cpu.pc(), 0x0001);
    assert_eq!(cycles, 4);
}

#[test]
fn pc_wraps_at_top_of_address_space() {
    let mut cpu = cpu_at(0xFFFF);
    let mut bus = TestBus::default();
    cpu.config = CpuConfig::builder().intercept_io(false).build();
    bus.memory[0xFFFF] = 0x00;

    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x0000);
}

#[test]
fn ld_16bit_and_basic_ld_indirect_work() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();

    // 0x0000: LD BC, 0x1234
    // 0x0003: LD (BC), A
    // 0x0004: LD A, (BC)
    bus.load(0x0000, &[0x01, 0x34, 0x12, 0x02, 0x0A]);
    cpu.regs.set_a(0xAB);

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(cpu.pc(), 0x0003);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.memory[0x1234], 0xAB);

    cpu.regs.set_a(0x00);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a(), 0xAB);
}

#[test]
fn ld_r_r_and_hl_inc_dec_forms_work() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();

    // 0x0000: LD HL, 0xC000
    // 0x0003: LD B, 0x12
    // 0x0005: LD (HL), B
    // 0x0006: LD A, (HL+)
    // 0x0007: LD (HL-), A
    // 0x0008: LD C, A
    bus.load(
        0x0000,
        &[0x21, 0x00, 0xC0, 0x06, 0x12, 0x70, 0x2A, 0x32, 0x4F],
    );

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.memory[0xC000], 0x12);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x12);
    assert_eq!(cpu.regs.hl(), 0xC001);

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0xC001], 0x12);
    assert_eq!(cpu.regs.hl(), 0xC000);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.c(), 0x12);
}

#[test]
fn ld_a16_sp_stores_little_endian() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // LD (0xC100), SP
    bus.load(0x0000, &[0x08, 0x00, 0xC1]);
    cpu.set_sp(0xBEEF);

    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(bus.memory[0xC100], 0xEF);
    assert_eq!(bus.memory[0xC101], 0xBE);
}

#[test]
fn inc_ff_sets_zero_and_half_carry_and_keeps_carry() {
    for carry in [false, true] {
        let mut cpu = cpu_at(0x0000);
        let mut bus = TestBus::default();
        // INC B
        bus.memory[0x0000] = 0x04;
        cpu.regs.set_b(0xFF);
        cpu.set_flag(Flags::N, true);
        cpu.set_flag(Flags::C, carry);

        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.regs.b(), 0x00);
        assert!(cpu.get_flag(Flags::Z));
        assert!(cpu.get_flag(Flags::H));
        assert!(!cpu.get_flag(Flags::N));
        assert_eq!(cpu.get_flag(Flags::C), carry);
        assert_eq!(cpu.regs.af() & 0x000F, 0);
    }
}

#[test]
fn inc_dec_on_hl_memory() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // INC (HL); DEC (HL); DEC (HL)
    bus.load(0x0000, &[0x34, 0x35, 0x35]);
    cpu.regs.set_hl(0xC000);
    bus.memory[0xC000] = 0x0F;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(bus.memory[0xC000], 0x10);
    assert!(cpu.get_flag(Flags::H));

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(bus.memory[0xC000], 0x0F);
    assert!(cpu.get_flag(Flags::N));
    assert!(cpu.get_flag(Flags::H));

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0xC000], 0x0E);
    assert!(!cpu.get_flag(Flags::H));
}

#[test]
fn add_flag_law_holds_for_all_operands() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    // ADD A, B
    bus.memory[0x0000] = 0x80;

    for a in 0..=255u8 {
        for b in 0..=255u8 {
            cpu.regs.pc = 0x0000;
            cpu.regs.set_a(a);
            cpu.regs.set_b(b);
            cpu.step(&mut bus);

            let sum = a as u16 + b as u16;
            assert_eq!(cpu.regs.a(), sum as u8);
            assert_eq!(cpu.get_flag(Flags::C), sum > 0xFF, "{a:#04x}+{b:#04x}");
            assert_eq!(
                cpu.get_flag(Flags::H),
                (a & 0x0F) + (b & 0x0F) > 0x0F,
                "{a:#04x}+{b:#04x}"
            );
            assert_eq!(cpu.get_flag(Flags::Z), sum as u8 == 0);
            assert!(!cpu.get_flag(Flags::N));
        }
    }
}

#[test]
fn sub_flag_law_holds_for_all_operands() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    // SUB B
    bus.memory[0x0000] = 0x90;

    for a in 0..=255u8 {
        for b in 0..=255u8 {
            cpu.regs.pc = 0x0000;
            cpu.regs.set_a(a);
            cpu.regs.set_b(b);
            cpu.step(&mut bus);

            assert_eq!(cpu.regs.a(), a.wrapping_sub(b));
            assert_eq!(cpu.get_flag(Flags::C), a < b, "{a:#04x}-{b:#04x}");
            assert_eq!(
                cpu.get_flag(Flags::H),
                (a & 0x0F) < (b & 0x0F),
                "{a:#04x}-{b:#04x}"
            );
            assert_eq!(cpu.get_flag(Flags::Z), a == b);
            assert!(cpu.get_flag(Flags::N));
        }
    }
}

#[test]
fn adc_and_sbc_fold_in_carry() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    // ADC A, B at 0x0000; SBC A, B at 0x0001
    bus.load(0x0000, &[0x88, 0x98]);

    for a in 0..=255u8 {
        for b in (0..=255u8).step_by(3) {
            for carry in [false, true] {
                let c = u8::from(carry);

                cpu.regs.pc = 0x0000;
                cpu.regs.set_a(a);
                cpu.regs.set_b(b);
                cpu.set_flag(Flags::C, carry);
                cpu.step(&mut bus);
                let sum = a as u16 + b as u16 + c as u16;
                assert_eq!(cpu.regs.a(), sum as u8);
                assert_eq!(cpu.get_flag(Flags::C), sum > 0xFF);
                assert_eq!(cpu.get_flag(Flags::H), (a & 0x0F) + (b & 0x0F) + c > 0x0F);

                cpu.regs.pc = 0x0001;
                cpu.regs.set_a(a);
                cpu.set_flag(Flags::C, carry);
                cpu.step(&mut bus);
                assert_eq!(cpu.regs.a(), a.wrapping_sub(b).wrapping_sub(c));
                assert_eq!(cpu.get_flag(Flags::C), (a as u16) < b as u16 + c as u16);
                assert_eq!(cpu.get_flag(Flags::H), (a & 0x0F) < (b & 0x0F) + c);
                assert!(cpu.get_flag(Flags::N));
            }
        }
    }
}

#[test]
fn add_hl_flag_law_on_random_operands() {
    let mut rng = rand::thread_rng();
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    // ADD HL, BC
    bus.memory[0x0000] = 0x09;

    for _ in 0..10_000 {
        let hl: u16 = rng.gen();
        let bc: u16 = rng.gen();
        let zero: bool = rng.gen();
        cpu.regs.pc = 0x0000;
        cpu.regs.set_hl(hl);
        cpu.regs.set_bc(bc);
        cpu.set_flag(Flags::Z, zero);

        assert_eq!(cpu.step(&mut bus), 8);
        assert_eq!(cpu.regs.hl(), hl.wrapping_add(bc));
        assert_eq!(cpu.get_flag(Flags::C), hl as u32 + bc as u32 > 0xFFFF);
        assert_eq!(cpu.get_flag(Flags::H), (hl & 0x0FFF) + (bc & 0x0FFF) > 0x0FFF);
        assert_eq!(cpu.get_flag(Flags::Z), zero);
        assert!(!cpu.get_flag(Flags::N));
    }
}

#[test]
fn add_sp_r8_signed_and_flags() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // ADD SP, -1 ; LD HL, SP+2
    bus.load(0x0000, &[0xE8, 0xFF, 0xF8, 0x02]);
    cpu.set_sp(0x0001);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.sp(), 0x0000);
    // 0x01 + 0xFF carries out of both bit 3 and bit 7.
    assert!(cpu.get_flag(Flags::H));
    assert!(cpu.get_flag(Flags::C));
    assert!(!cpu.get_flag(Flags::Z));

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.hl(), 0x0002);
    assert!(!cpu.get_flag(Flags::H));
    assert!(!cpu.get_flag(Flags::C));
}

#[test]
fn daa_corrects_bcd_addition() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // LD A, 0x45 ; ADD A, 0x38 ; DAA
    bus.load(0x0000, &[0x3E, 0x45, 0xC6, 0x38, 0x27]);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a(), 0x7D);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x83);
    assert!(!cpu.get_flag(Flags::C));
}

#[test]
fn rotate_a_forms_clear_zero() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // RLCA ; RRA
    bus.load(0x0000, &[0x07, 0x1F]);
    cpu.regs.set_a(0x80);
    cpu.set_flag(Flags::Z, true);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a(), 0x01);
    assert!(cpu.get_flag(Flags::C));
    assert!(!cpu.get_flag(Flags::Z));

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a(), 0x80);
    assert!(cpu.get_flag(Flags::C));
}

#[test]
fn push_and_pop_roundtrip_and_pop_af_masks_low_flags() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // LD BC, 0x12FF ; PUSH BC ; POP AF ; PUSH AF ; POP DE
    bus.load(0x0000, &[0x01, 0xFF, 0x12, 0xC5, 0xF1, 0xF5, 0xD1]);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.sp(), 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0xFF);
    assert_eq!(bus.memory[0xFFFD], 0x12);

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.af(), 0x12F0);
    assert_eq!(cpu.sp(), 0xFFFE);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.de(), 0x12F0);
}

#[test]
fn jr_cycles_depend_on_condition() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // JR NZ, +5
    bus.load(0x0000, &[0x20, 0x05]);

    cpu.set_flag(Flags::Z, true);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.pc(), 0x0002);

    cpu.regs.pc = 0x0000;
    cpu.set_flag(Flags::Z, false);
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.pc(), 0x0007);
}

#[test]
fn jr_backwards_loops_in_place() {
    let mut cpu = cpu_at(0x0010);
    let mut bus = TestBus::default();
    // JR -2
    bus.load(0x0010, &[0x18, 0xFE]);

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.pc(), 0x0010);
}

#[test]
fn call_and_ret_use_stack() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // 0x0200: CALL 0x0300 ; 0x0300: RET
    bus.load(0x0200, &[0xCD, 0x00, 0x03]);
    bus.memory[0x0300] = 0xC9;

    assert_eq!(cpu.step(&mut bus), 24);
    assert_eq!(cpu.pc(), 0x0300);
    assert_eq!(cpu.sp(), 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x03);
    assert_eq!(bus.memory[0xFFFD], 0x02);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.pc(), 0x0203);
    assert_eq!(cpu.sp(), 0xFFFE);
}

#[test]
fn conditional_call_ret_and_jp_cycles() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // CALL C, 0x0300 ; JP NC, 0x0400
    bus.load(0x0200, &[0xDC, 0x00, 0x03, 0xD2, 0x00, 0x04]);
    // 0x0400: RET Z ; RET NZ
    bus.load(0x0400, &[0xC8, 0xC0]);
    cpu.set_flag(Flags::C, false);
    cpu.set_flag(Flags::Z, false);
    cpu.regs.sp = 0xD000;
    bus.memory[0xD000] = 0x34;
    bus.memory[0xD001] = 0x12;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.pc(), 0x0203);
    assert_eq!(cpu.sp(), 0xD000);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.pc(), 0x0400);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.pc(), 0x0401);

    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(cpu.sp(), 0xD002);
}

#[test]
fn rst_pushes_and_jumps_to_fixed_address() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // RST 28h
    bus.memory[0x0200] = 0xEF;

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.pc(), 0x0028);
    assert_eq!(bus.memory[0xFFFC], 0x01);
    assert_eq!(bus.memory[0xFFFD], 0x02);
}

#[test]
fn cb_prefixed_ops_and_cycles() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // SWAP A ; BIT 0,(HL) ; RES 0,(HL) ; SET 7,(HL) ; SRL B
    bus.load(
        0x0000,
        &[0xCB, 0x37, 0xCB, 0x46, 0xCB, 0x86, 0xCB, 0xFE, 0xCB, 0x38],
    );
    cpu.regs.set_a(0xF0);
    cpu.regs.set_hl(0xC000);
    cpu.regs.set_b(0x01);
    bus.memory[0xC000] = 0x7F;
    cpu.set_flag(Flags::C, true);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x0F);
    assert_eq!(cpu.regs.f(), Flags::empty());

    cpu.set_flag(Flags::C, true);
    assert_eq!(cpu.step(&mut bus), 12);
    assert!(!cpu.get_flag(Flags::Z));
    assert!(cpu.get_flag(Flags::H));
    assert!(cpu.get_flag(Flags::C));

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x7E);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0xFE);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.b(), 0x00);
    assert!(cpu.get_flag(Flags::Z));
    assert!(cpu.get_flag(Flags::C));
    assert_eq!(cpu.pc(), 0x000A);
}

#[test]
fn unassigned_opcodes_are_cheap_nops() {
    for opcode in [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ] {
        let mut cpu = cpu_at(0x0000);
        let mut bus = TestBus::default();
        bus.memory[0x0000] = opcode;
        let before = cpu.snapshot();

        assert_eq!(cpu.step(&mut bus), 4, "opcode {opcode:#04x}");
        let after = cpu.snapshot();
        assert_eq!(after.pc, 0x0001);
        assert_eq!(CpuSnapshot { pc: 0, timer: before.timer, ..after }, CpuSnapshot { pc: 0, ..before });
    }
}

#[test]
fn every_opcode_reports_a_bounded_cost() {
    for opcode in 0..=255u8 {
        let mut cpu = cpu_at(0x0000);
        let mut bus = TestBus::default();
        bus.load(0x0000, &[opcode, 0x00, 0x00]);
        let cycles = cpu.step(&mut bus);
        assert!((4..=24).contains(&cycles), "opcode {opcode:#04x} took {cycles}");
        assert_eq!(cycles % 4, 0);
    }
}

#[test]
fn interrupt_is_taken_at_boundary() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    cpu.set_ime(true);
    cpu.interrupts_mut().enable(InterruptLine::Timer, true);
    cpu.request_interrupt(InterruptLine::Timer);

    // Entry (20) plus the NOP at the vector (4).
    assert_eq!(cpu.step(&mut bus), INTERRUPT_CYCLES + 4);
    assert_eq!(cpu.pc(), 0x0051);
    assert_eq!(cpu.sp(), 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x00);
    assert_eq!(bus.memory[0xFFFD], 0x02);
    assert!(!cpu.ime());
    assert!(!cpu.interrupts().is_requested(InterruptLine::Timer));
    assert_eq!(bus.acknowledged, vec![InterruptLine::Timer.index()]);
    assert_eq!(bus.pc_changes, vec![0x0200, 0x0050]);
}

#[test]
fn only_one_interrupt_per_boundary_lowest_line_first() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // Handlers re-enable interrupts: EI at each vector.
    bus.memory[0x0040] = 0xFB;
    bus.memory[0x0060] = 0xFB;
    cpu.set_ime(true);
    cpu.interrupts_mut().set_enabled(0x1F);
    cpu.request_interrupt(InterruptLine::Joypad);
    cpu.request_interrupt(InterruptLine::VBlank);

    cpu.step(&mut bus);
    assert_eq!(bus.acknowledged, vec![0]);
    assert_eq!(cpu.pc(), 0x0041);
    assert!(cpu.interrupts().is_requested(InterruptLine::Joypad));

    // EI delay: the next boundary still runs handler code.
    cpu.step(&mut bus);
    assert_eq!(bus.acknowledged, vec![0]);

    cpu.step(&mut bus);
    assert_eq!(bus.acknowledged, vec![0, 4]);
    assert_eq!(cpu.pc(), 0x0061);
}

#[test]
fn masked_or_disabled_interrupts_are_not_taken() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    cpu.request_interrupt(InterruptLine::Serial);
    cpu.interrupts_mut().enable(InterruptLine::Serial, true);

    // IME clear.
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.pc(), 0x0201);

    // IME set but line masked.
    cpu.set_ime(true);
    cpu.interrupts_mut().enable(InterruptLine::Serial, false);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.pc(), 0x0202);
    assert!(bus.acknowledged.is_empty());
}

#[test]
fn ei_takes_effect_after_next_instruction() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // EI ; NOP ; NOP
    bus.load(0x0200, &[0xFB, 0x00, 0x00]);
    cpu.interrupts_mut().enable(InterruptLine::VBlank, true);
    cpu.request_interrupt(InterruptLine::VBlank);

    cpu.step(&mut bus);
    assert!(!cpu.ime());
    assert!(cpu.state().contains(CpuState::IME_PENDING));

    cpu.step(&mut bus);
    assert!(cpu.ime());
    assert_eq!(cpu.pc(), 0x0202);

    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x0041);
    assert_eq!(bus.memory[0xFFFC], 0x02);
    assert_eq!(bus.memory[0xFFFD], 0x02);
}

#[test]
fn ei_without_delay_enables_immediately() {
    let mut cpu = Cpu::with_config(CpuConfig::builder().ei_delay(false).build());
    cpu.set_pc(0x0200);
    let mut bus = TestBus::default();
    bus.load(0x0200, &[0xFB, 0x00]);
    cpu.interrupts_mut().enable(InterruptLine::VBlank, true);
    cpu.request_interrupt(InterruptLine::VBlank);

    cpu.step(&mut bus);
    assert!(cpu.ime());
    cpu.step(&mut bus);
    assert_eq!(bus.memory[0xFFFC], 0x01);
    assert_eq!(bus.memory[0xFFFD], 0x02);
}

#[test]
fn di_cancels_pending_ei_and_reti_enables() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // EI ; DI ; NOP
    bus.load(0x0200, &[0xFB, 0xF3, 0x00]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(!cpu.ime());

    // RETI
    bus.memory[0x0203] = 0xD9;
    cpu.regs.sp = 0xD000;
    bus.memory[0xD000] = 0x00;
    bus.memory[0xD001] = 0x03;
    assert_eq!(cpu.step(&mut bus), 16);
    assert!(cpu.ime());
    assert_eq!(cpu.pc(), 0x0300);
}

#[test]
fn halt_idles_until_interrupt_then_resumes_after_halt() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // HALT ; NOP
    bus.load(0x0200, &[0x76, 0x00]);
    cpu.set_ime(true);
    cpu.interrupts_mut().enable(InterruptLine::VBlank, true);

    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.halted());
    assert_eq!(cpu.pc(), 0x0200);

    assert_eq!(cpu.run(&mut bus, 100), 100);
    assert!(cpu.halted());
    assert_eq!(cpu.pc(), 0x0200);

    cpu.request_interrupt(InterruptLine::VBlank);
    cpu.step(&mut bus);
    assert!(!cpu.halted());
    assert_eq!(cpu.pc(), 0x0041);
    // Return address is the instruction after HALT.
    assert_eq!(bus.memory[0xFFFC], 0x01);
    assert_eq!(bus.memory[0xFFFD], 0x02);
}

#[test]
fn halt_with_ime_clear_wakes_without_servicing() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    // HALT ; INC A
    bus.load(0x0200, &[0x76, 0x3C]);
    cpu.regs.set_a(0x00);

    cpu.step(&mut bus);
    cpu.run(&mut bus, 40);
    assert!(cpu.halted());

    cpu.interrupts_mut().enable(InterruptLine::Joypad, true);
    cpu.set_irq_line(InterruptLine::Joypad, true);
    cpu.step(&mut bus);
    assert!(!cpu.halted());
    assert_eq!(cpu.regs.a(), 0x01);
    assert_eq!(cpu.pc(), 0x0202);
    assert!(cpu.interrupts().is_requested(InterruptLine::Joypad));
    assert!(bus.acknowledged.is_empty());
}

#[test]
fn timer_overflow_raises_interrupt_and_vectors() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    cpu.timer_mut().write_tac(0x05);
    cpu.timer_mut().write_tma(0xAB);
    cpu.timer_mut().write_tima(0xFF);
    cpu.interrupts_mut().enable(InterruptLine::Timer, true);
    cpu.set_ime(true);

    // Four NOPs push TIMA past 0xFF at 16 cycles per tick.
    assert_eq!(cpu.run(&mut bus, 16), 16);
    assert!(cpu.interrupts().is_requested(InterruptLine::Timer));
    assert_eq!(cpu.timer().tima(), 0xAB);
    assert_eq!(cpu.pc(), 0x0204);

    cpu.step(&mut bus);
    assert_eq!(cpu.sp(), 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x04);
    assert_eq!(bus.memory[0xFFFD], 0x02);
    assert_eq!(cpu.pc(), InterruptLine::Timer.vector() + 1);
}

#[test]
fn io_registers_are_intercepted() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // LD A, 0x05 ; LDH (0x07), A ; LDH A, (0x0F) ; LD (0xFFFF), A
    bus.load(
        0x0000,
        &[0x3E, 0x05, 0xE0, 0x07, 0xF0, 0x0F, 0xEA, 0xFF, 0xFF],
    );

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.timer().tac(), 0xFD);
    assert_eq!(bus.memory[0xFF07], 0x00);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a(), 0xE0);

    cpu.step(&mut bus);
    assert_eq!(cpu.interrupts().enabled(), 0x00);
    assert_eq!(bus.memory[0xFFFF], 0x00);
}

#[test]
fn io_registers_reach_bus_when_not_intercepted() {
    let mut cpu = Cpu::with_config(CpuConfig::builder().intercept_io(false).build());
    cpu.set_pc(0x0000);
    let mut bus = TestBus::default();
    // LD A, 0x05 ; LDH (0x07), A
    bus.load(0x0000, &[0x3E, 0x05, 0xE0, 0x07]);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(bus.memory[0xFF07], 0x05);
    assert!(!cpu.timer().enabled());
}

#[test]
fn run_overruns_by_at_most_one_boundary() {
    let mut bus = TestBus::default();
    // CALL 0x0000 forever: 24 cycles per instruction.
    bus.load(0x0000, &[0xCD, 0x00, 0x00]);

    for budget in 0..200u32 {
        let mut cpu = cpu_at(0x0000);
        let consumed = cpu.run(&mut bus, budget);
        let budget = u64::from(budget);
        assert!(consumed >= budget);
        assert!(consumed - budget < 24 || budget == 0);
        assert_eq!(consumed % 24, 0);
    }
}

#[test]
fn burn_rounds_to_whole_steps_and_keeps_registers() {
    let mut cpu = Cpu::new();
    let regs = cpu.regs;
    let before = cpu.total_cycles();

    assert_eq!(cpu.burn(10), 12);
    assert_eq!(cpu.burn(0), 0);
    assert_eq!(cpu.total_cycles() - before, 12);
    assert_eq!(cpu.regs, regs);

    cpu.burn(256);
    assert_eq!(cpu.timer().div(), 1);
}

#[test]
fn burn_accepts_the_full_u32_range() {
    let mut cpu = Cpu::new();
    cpu.timer_mut().write_tac(0x05);
    cpu.timer_mut().write_tma(0xFF);

    assert_eq!(cpu.burn(u32::MAX - 1), 1 << 32);
    assert_eq!(cpu.burn(u32::MAX), 1 << 32);
    assert_eq!(cpu.total_cycles(), 2 << 32);
    assert!(cpu.interrupts().is_requested(InterruptLine::Timer));
    assert_eq!(cpu.timer().tima(), 0xFF);
}

#[test]
fn burn_matches_running_nops() {
    let mut burned = Cpu::new();
    burned.timer_mut().write_tac(0x05);
    burned.timer_mut().write_tma(0xC0);
    let mut ran = burned.clone();
    ran.set_pc(0x0000);
    let mut bus = TestBus::default();

    burned.burn(10_000);
    ran.run(&mut bus, 10_000);

    assert_eq!(burned.timer(), ran.timer());
    assert_eq!(burned.interrupts().requested(), ran.interrupts().requested());
    assert_eq!(burned.total_cycles(), ran.total_cycles());
}

#[test]
fn pc_changes_are_reported() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // NOP ; JP 0x0100
    bus.load(0x0000, &[0x00, 0xC3, 0x00, 0x01]);

    cpu.step(&mut bus);
    assert_eq!(bus.pc_changes, vec![0x0000]);
    cpu.step(&mut bus);
    assert_eq!(bus.pc_changes, vec![0x0000, 0x0100]);

    cpu.set_register(Reg::Pc, 0x0000);
    cpu.step(&mut bus);
    assert_eq!(bus.pc_changes.last(), Some(&0x0000));
}

#[test]
fn register_api_by_name_and_id() {
    let mut cpu = Cpu::new();
    cpu.set_register("de".parse().unwrap(), 0x1357);
    assert_eq!(cpu.get_register_by_id(Reg::De as u8), Ok(0x1357));
    cpu.set_register_by_id(Reg::Af as u8, 0xFFFF).unwrap();
    assert_eq!(cpu.get_register(Reg::Af), 0xFFF0);
    assert_eq!(cpu.get_reg8(Reg8::A), 0xFF);
    cpu.set_reg8(Reg8::L, 0x99);
    assert_eq!(cpu.get_register(Reg::Hl) & 0xFF, 0x99);

    cpu.set_register(Reg::IrqState, 0x04);
    assert!(cpu.interrupts().is_requested(InterruptLine::Timer));

    assert_eq!(
        cpu.get_register_by_id(42),
        Err(CoreError::InvalidRegister("42".to_string()))
    );
    assert!(cpu.set_register_by_id(0, 0).is_err());
}

#[test]
fn snapshot_round_trip_on_random_states() {
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let snapshot = CpuSnapshot {
            af: rng.gen::<u16>() & 0xFFF0,
            bc: rng.gen(),
            de: rng.gen(),
            hl: rng.gen(),
            pc: rng.gen(),
            sp: rng.gen(),
            state: CpuState::from_bits_truncate(rng.gen()),
            interrupts: Interrupts::from_raw(rng.gen(), rng.gen(), rng.gen()),
            timer: Timer {
                divider: rng.gen(),
                counter: rng.gen_range(0..0x4_0000),
                tac: rng.gen::<u8>() & 0x07,
                tma: rng.gen(),
            },
        };

        let mut cpu = Cpu::new();
        cpu.restore(&snapshot);
        let blob = cpu.export_state();

        let mut other = Cpu::new();
        other.import_state(&blob).unwrap();
        assert_eq!(other.snapshot(), snapshot);
        assert_eq!(other.export_state(), blob);
    }
}

#[test]
fn disassembly_stub_prints_hex_byte() {
    let cpu = Cpu::new();
    let mut bus = TestBus::default();
    bus.memory[0x0150] = 0xC3;
    assert_eq!(cpu.disassemble(&mut bus, 0x0150), ("$c3".to_string(), 1));
}
