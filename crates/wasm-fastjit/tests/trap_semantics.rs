//! Runtime-semantics tests: the emitted IR is executed by the reference
//! evaluator to check the trap and saturation behavior the generated
//! code must exhibit, boundary values included.

#![allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use wasm_fastjit::test_harness::{Value, eval_unary};
use wasm_fastjit::{ConvOp, ExceptionCode};

const TRAPPING_TRUNCS_F32: [ConvOp; 4] = [
    ConvOp::I32TruncF32 {
        signed: true,
        saturating: false,
    },
    ConvOp::I32TruncF32 {
        signed: false,
        saturating: false,
    },
    ConvOp::I64TruncF32 {
        signed: true,
        saturating: false,
    },
    ConvOp::I64TruncF32 {
        signed: false,
        saturating: false,
    },
];

const TRAPPING_TRUNCS_F64: [ConvOp; 4] = [
    ConvOp::I32TruncF64 {
        signed: true,
        saturating: false,
    },
    ConvOp::I32TruncF64 {
        signed: false,
        saturating: false,
    },
    ConvOp::I64TruncF64 {
        signed: true,
        saturating: false,
    },
    ConvOp::I64TruncF64 {
        signed: false,
        saturating: false,
    },
];

const SAT_TRUNCS_F32: [ConvOp; 4] = [
    ConvOp::I32TruncF32 {
        signed: true,
        saturating: true,
    },
    ConvOp::I32TruncF32 {
        signed: false,
        saturating: true,
    },
    ConvOp::I64TruncF32 {
        signed: true,
        saturating: true,
    },
    ConvOp::I64TruncF32 {
        signed: false,
        saturating: true,
    },
];

const SAT_TRUNCS_F64: [ConvOp; 4] = [
    ConvOp::I32TruncF64 {
        signed: true,
        saturating: true,
    },
    ConvOp::I32TruncF64 {
        signed: false,
        saturating: true,
    },
    ConvOp::I64TruncF64 {
        signed: true,
        saturating: true,
    },
    ConvOp::I64TruncF64 {
        signed: false,
        saturating: true,
    },
];

fn expect_int_zero(value: Value) {
    match value {
        Value::I32(v) => assert_eq!(v, 0),
        Value::I64(v) => assert_eq!(v, 0),
        other => panic!("expected integer result, got {other:?}"),
    }
}

#[test]
fn test_nan_traps_invalid_conversion() {
    for op in TRAPPING_TRUNCS_F32 {
        assert_eq!(
            eval_unary(op, Value::F32(f32::NAN)),
            Err(ExceptionCode::InvalidConversionToInteger),
            "{op:?}"
        );
    }
    for op in TRAPPING_TRUNCS_F64 {
        assert_eq!(
            eval_unary(op, Value::F64(f64::NAN)),
            Err(ExceptionCode::InvalidConversionToInteger),
            "{op:?}"
        );
    }
}

#[test]
fn test_nan_saturates_to_zero() {
    for op in SAT_TRUNCS_F32 {
        expect_int_zero(eval_unary(op, Value::F32(f32::NAN)).expect("saturating never traps"));
    }
    for op in SAT_TRUNCS_F64 {
        expect_int_zero(eval_unary(op, Value::F64(f64::NAN)).expect("saturating never traps"));
    }
}

#[test]
fn test_signed_i32_max_is_exclusive() {
    let trapping = ConvOp::I32TruncF32 {
        signed: true,
        saturating: false,
    };
    // 2^31 exactly is out of range for i32.
    assert_eq!(
        eval_unary(trapping, Value::F32(2_147_483_648.0)),
        Err(ExceptionCode::IntegerOverflow)
    );
    // The largest f32 below 2^31 converts.
    assert_eq!(
        eval_unary(trapping, Value::F32(2_147_483_520.0)),
        Ok(Value::I32(2_147_483_520))
    );

    let saturating = ConvOp::I32TruncF32 {
        signed: true,
        saturating: true,
    };
    assert_eq!(
        eval_unary(saturating, Value::F32(2_147_483_648.0)),
        Ok(Value::I32(i32::MAX))
    );
}

#[test]
fn test_signed_i32_min_boundary_f64() {
    let trapping = ConvOp::I32TruncF64 {
        signed: true,
        saturating: false,
    };
    // Fractional values below i32::MIN still truncate into range.
    assert_eq!(
        eval_unary(trapping, Value::F64(-2_147_483_648.9)),
        Ok(Value::I32(i32::MIN))
    );
    assert_eq!(
        eval_unary(trapping, Value::F64(-2_147_483_649.0)),
        Err(ExceptionCode::IntegerOverflow)
    );
}

#[test]
fn test_unsigned_min_boundary() {
    let trapping = ConvOp::I32TruncF64 {
        signed: false,
        saturating: false,
    };
    assert_eq!(
        eval_unary(trapping, Value::F64(-1.0)),
        Err(ExceptionCode::IntegerOverflow)
    );
    // (-1, 0) truncates to 0.
    assert_eq!(eval_unary(trapping, Value::F64(-0.9)), Ok(Value::I32(0)));
    assert_eq!(
        eval_unary(trapping, Value::F64(4_294_967_296.0)),
        Err(ExceptionCode::IntegerOverflow)
    );
    assert_eq!(
        eval_unary(trapping, Value::F64(4_294_967_295.0)),
        Ok(Value::I32(-1)) // u32::MAX bit pattern
    );
}

#[test]
fn test_trunc_sat_f64_u_scenario() {
    let op = ConvOp::I32TruncF64 {
        signed: false,
        saturating: true,
    };
    assert_eq!(eval_unary(op, Value::F64(-5.0)), Ok(Value::I32(0)));

    let clamped = eval_unary(op, Value::F64(1e20)).expect("no trap").unwrap_i32();
    assert_eq!(clamped as u32, u32::MAX);

    assert_eq!(eval_unary(op, Value::F64(f64::NAN)), Ok(Value::I32(0)));
}

#[test]
fn test_saturating_clamps_signed_extremes() {
    let op = ConvOp::I32TruncF64 {
        signed: true,
        saturating: true,
    };
    assert_eq!(eval_unary(op, Value::F64(1e10)), Ok(Value::I32(i32::MAX)));
    assert_eq!(eval_unary(op, Value::F64(-1e10)), Ok(Value::I32(i32::MIN)));
    assert_eq!(
        eval_unary(op, Value::F64(f64::INFINITY)),
        Ok(Value::I32(i32::MAX))
    );
    assert_eq!(
        eval_unary(op, Value::F64(f64::NEG_INFINITY)),
        Ok(Value::I32(i32::MIN))
    );
}

#[test]
fn test_i64_unsigned_saturation_and_trap() {
    let saturating = ConvOp::I64TruncF64 {
        signed: false,
        saturating: true,
    };
    let clamped = eval_unary(saturating, Value::F64(1e300))
        .expect("no trap")
        .unwrap_i64();
    assert_eq!(clamped as u64, u64::MAX);

    let trapping = ConvOp::I64TruncF64 {
        signed: false,
        saturating: false,
    };
    assert_eq!(
        eval_unary(trapping, Value::F64(1e300)),
        Err(ExceptionCode::IntegerOverflow)
    );
    assert_eq!(
        eval_unary(trapping, Value::F64(18_446_744_073_709_549_568.0)),
        Ok(Value::I64(-2048)) // largest f64 below 2^64, as u64 bits
    );
}

#[test]
fn test_trapping_and_saturating_agree_in_range() {
    let in_range = [-2_147_483_648.0, -100.5, -0.75, 0.0, 1.0, 42.9, 2_147_483_647.0];
    for v in in_range {
        let trapped = eval_unary(
            ConvOp::I32TruncF64 {
                signed: true,
                saturating: false,
            },
            Value::F64(v),
        )
        .expect("in-range value must not trap");
        let saturated = eval_unary(
            ConvOp::I32TruncF64 {
                signed: true,
                saturating: true,
            },
            Value::F64(v),
        )
        .expect("saturating never traps");
        assert_eq!(trapped, saturated, "divergence at {v}");
    }
}

#[test]
fn test_wrap_extend_round_trip() {
    for x in [0i32, 1, -1, i32::MIN, i32::MAX, 0x5a5a_5a5a] {
        let extended = eval_unary(ConvOp::I64ExtendI32 { signed: true }, Value::I32(x))
            .expect("extend never traps");
        let wrapped = eval_unary(ConvOp::I32WrapI64, extended).expect("wrap never traps");
        assert_eq!(wrapped, Value::I32(x));
    }
}

#[test]
fn test_extend_unsigned_zeroes_high_bits() {
    assert_eq!(
        eval_unary(ConvOp::I64ExtendI32 { signed: false }, Value::I32(-1)),
        Ok(Value::I64(0xffff_ffff))
    );
    assert_eq!(
        eval_unary(ConvOp::I64ExtendI32 { signed: true }, Value::I32(-1)),
        Ok(Value::I64(-1))
    );
}

#[test]
fn test_narrow_sign_extension() {
    assert_eq!(
        eval_unary(ConvOp::I32Extend { bitwidth: 8 }, Value::I32(0x80)),
        Ok(Value::I32(-128))
    );
    assert_eq!(
        eval_unary(ConvOp::I32Extend { bitwidth: 16 }, Value::I32(0x7fff)),
        Ok(Value::I32(0x7fff))
    );
    assert_eq!(
        eval_unary(ConvOp::I64Extend { bitwidth: 8 }, Value::I64(0x1_80)),
        Ok(Value::I64(-128))
    );
    assert_eq!(
        eval_unary(ConvOp::I64Extend { bitwidth: 32 }, Value::I64(0x8000_0000)),
        Ok(Value::I64(-2_147_483_648))
    );
}

#[test]
fn test_reinterpret_round_trip_preserves_nan_payload() {
    // A quiet NaN with a non-default payload must survive bit-exactly.
    let nan_bits: i32 = 0x7fc0_1234;
    let as_float = eval_unary(ConvOp::F32ReinterpretI32, Value::I32(nan_bits))
        .expect("reinterpret never traps");
    assert!(as_float.unwrap_f32().is_nan());
    let back = eval_unary(ConvOp::I32ReinterpretF32, as_float).expect("reinterpret never traps");
    assert_eq!(back, Value::I32(nan_bits));

    let nan_bits64: i64 = 0x7ff8_0000_dead_beef_u64 as i64;
    let as_double = eval_unary(ConvOp::F64ReinterpretI64, Value::I64(nan_bits64))
        .expect("reinterpret never traps");
    let back = eval_unary(ConvOp::I64ReinterpretF64, as_double).expect("reinterpret never traps");
    assert_eq!(back, Value::I64(nan_bits64));
}

#[test]
fn test_u64_to_float_boundary_cases() {
    assert_eq!(
        eval_unary(ConvOp::F64ConvertI64 { signed: false }, Value::I64(0)),
        Ok(Value::F64(0.0))
    );
    // 2^63: a naive signed convert would produce a negative value.
    assert_eq!(
        eval_unary(ConvOp::F64ConvertI64 { signed: false }, Value::I64(i64::MIN)),
        Ok(Value::F64(9_223_372_036_854_775_808.0))
    );
    assert_eq!(
        eval_unary(ConvOp::F64ConvertI64 { signed: false }, Value::I64(-1)),
        Ok(Value::F64(18_446_744_073_709_551_616.0)) // u64::MAX rounds up
    );
    assert_eq!(
        eval_unary(ConvOp::F32ConvertI64 { signed: false }, Value::I64(-1)),
        Ok(Value::F32(18_446_744_073_709_551_616.0))
    );
}

#[test]
fn test_demote_promote() {
    assert_eq!(
        eval_unary(ConvOp::F64PromoteF32, Value::F32(1.5)),
        Ok(Value::F64(1.5))
    );
    assert_eq!(
        eval_unary(ConvOp::F32DemoteF64, Value::F64(1.5)),
        Ok(Value::F32(1.5))
    );
    // Values beyond f32 range demote to infinity.
    assert_eq!(
        eval_unary(ConvOp::F32DemoteF64, Value::F64(1e300)),
        Ok(Value::F32(f32::INFINITY))
    );
}
