//! # 元素周期表
//!
//! 元素符号与原子序数之间的映射，覆盖完整周期表（H 到 Og）。
//! 查找表在首次使用时构建一次，此后只读，可被多个线程共享。
//!
//! ## 依赖关系
//! - 被 `parsers/gjf.rs` 使用
//! - 被 `commands/summary.rs` 使用（化学式显示）

use lazy_static::lazy_static;
use std::collections::HashMap;

/// 按原子序数排列的元素符号，下标 0 对应 H (Z = 1)
pub const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", // 1-2
    "Li", "Be", "B", "C", "N", "O", "F", "Ne", // 3-10
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", // 11-18
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr", // 19-36
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe", // 37-54
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At",
    "Rn", // 55-86
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts",
    "Og", // 87-118
];

lazy_static! {
    static ref SYMBOL_TO_Z: HashMap<&'static str, u32> = ELEMENT_SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, &symbol)| (symbol, i as u32 + 1))
        .collect();
}

/// 元素符号 -> 原子序数（区分大小写，"Fe" 合法，"FE" 不合法）
pub fn atomic_number(symbol: &str) -> Option<u32> {
    SYMBOL_TO_Z.get(symbol).copied()
}

/// 原子序数 -> 元素符号
pub fn symbol(atomic_number: u32) -> Option<&'static str> {
    if atomic_number == 0 {
        return None;
    }
    ELEMENT_SYMBOLS.get(atomic_number as usize - 1).copied()
}
