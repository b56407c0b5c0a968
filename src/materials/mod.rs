//! 材料识别领域函数
//!
//! 基于参考材料库做最近邻匹配：两个 Raman 峰位（cm^-1）+ 形成能（eV/atom）
//! 对每条参考谱计算加权距离，距离在阈值内取最近者并给出置信度。

use serde::Serialize;
use thiserror::Error;

/// Raman 峰位有效范围（cm^-1）
const PEAK_RANGE: std::ops::RangeInclusive<f64> = 100.0..=2000.0;
/// 形成能有效范围（eV/atom）
const FORMATION_ENERGY_RANGE: std::ops::RangeInclusive<f64> = -15.0..=0.0;
/// 形成能与峰位量纲不同（~10 eV vs ~1000 cm^-1），距离计算时放大权重
const FORMATION_ENERGY_WEIGHT: f64 = 20.0;
/// 超过该距离视为库中无匹配
const MAX_MATCH_DISTANCE: f64 = 60.0;

/// 领域错误：超出物理范围或库中无匹配
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("{name} = {value} cm^-1 is outside the measurable range 100-2000 cm^-1")]
    PeakOutOfRange { name: &'static str, value: f64 },

    #[error("formation energy {0} eV/atom is outside the expected range -15 to 0 eV/atom")]
    FormationEnergyOutOfRange(f64),

    #[error("no reference material matches the given peaks and formation energy")]
    NoMatch,
}

/// 识别结果：材料名、化学式、置信度（0-1）
#[derive(Clone, Debug, Serialize)]
pub struct Identification {
    pub material: String,
    pub formula: String,
    pub confidence: f64,
}

/// 参考谱条目：名称、化学式、两个特征峰、形成能
struct ReferenceMaterial {
    name: &'static str,
    formula: &'static str,
    peak_1: f64,
    peak_2: f64,
    formation_energy: f64,
}

const REFERENCE_MATERIALS: &[ReferenceMaterial] = &[
    ReferenceMaterial {
        name: "Ceria",
        formula: "CeO2",
        peak_1: 465.0,
        peak_2: 610.0,
        formation_energy: -11.2,
    },
    ReferenceMaterial {
        name: "Anatase",
        formula: "TiO2",
        peak_1: 144.0,
        peak_2: 399.0,
        formation_energy: -9.8,
    },
    ReferenceMaterial {
        name: "Rutile",
        formula: "TiO2",
        peak_1: 447.0,
        peak_2: 612.0,
        formation_energy: -9.7,
    },
    ReferenceMaterial {
        name: "Silicon",
        formula: "Si",
        peak_1: 520.0,
        peak_2: 950.0,
        formation_energy: -0.5,
    },
    ReferenceMaterial {
        name: "Quartz",
        formula: "SiO2",
        peak_1: 464.0,
        peak_2: 1085.0,
        formation_energy: -9.6,
    },
    ReferenceMaterial {
        name: "Hematite",
        formula: "Fe2O3",
        peak_1: 225.0,
        peak_2: 292.0,
        formation_energy: -8.2,
    },
];

/// 参考材料库：范围校验 + 最近邻匹配
#[derive(Default)]
pub struct MaterialIndex;

impl MaterialIndex {
    pub fn new() -> Self {
        Self
    }

    /// 识别材料：校验范围后在参考库中取加权距离最近者
    pub fn identify(
        &self,
        peak_1: f64,
        peak_2: f64,
        formation_energy: f64,
    ) -> Result<Identification, MaterialError> {
        for (name, value) in [("peak_1", peak_1), ("peak_2", peak_2)] {
            if !PEAK_RANGE.contains(&value) {
                return Err(MaterialError::PeakOutOfRange { name, value });
            }
        }
        if !FORMATION_ENERGY_RANGE.contains(&formation_energy) {
            return Err(MaterialError::FormationEnergyOutOfRange(formation_energy));
        }

        let best = REFERENCE_MATERIALS
            .iter()
            .map(|m| (m, distance(m, peak_1, peak_2, formation_energy)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(MaterialError::NoMatch)?;

        let (material, dist) = best;
        if dist > MAX_MATCH_DISTANCE {
            return Err(MaterialError::NoMatch);
        }

        Ok(Identification {
            material: material.name.to_string(),
            formula: material.formula.to_string(),
            confidence: confidence(dist),
        })
    }
}

/// 加权欧氏距离：峰位直接取差，形成能乘权重对齐量纲
fn distance(m: &ReferenceMaterial, peak_1: f64, peak_2: f64, formation_energy: f64) -> f64 {
    let dp1 = peak_1 - m.peak_1;
    let dp2 = peak_2 - m.peak_2;
    let dfe = (formation_energy - m.formation_energy) * FORMATION_ENERGY_WEIGHT;
    (dp1 * dp1 + dp2 * dp2 + dfe * dfe).sqrt()
}

/// 距离映射为置信度：0 距离为 1.0，阈值处为 0，保留两位小数
fn confidence(dist: f64) -> f64 {
    let raw = 1.0 - dist / MAX_MATCH_DISTANCE;
    (raw.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_ceria_exactly() {
        let index = MaterialIndex::new();
        let id = index.identify(465.0, 610.0, -11.2).unwrap();
        assert_eq!(id.material, "Ceria");
        assert_eq!(id.formula, "CeO2");
        assert!((id.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn identifies_anatase_near_reference() {
        let index = MaterialIndex::new();
        let id = index.identify(146.0, 396.0, -9.9).unwrap();
        assert_eq!(id.material, "Anatase");
        assert!(id.confidence > 0.8);
    }

    #[test]
    fn rejects_peak_out_of_range() {
        let index = MaterialIndex::new();
        let err = index.identify(50.0, 610.0, -11.2).unwrap_err();
        assert!(matches!(err, MaterialError::PeakOutOfRange { name: "peak_1", .. }));
        assert!(err.to_string().contains("peak_1"));
    }

    #[test]
    fn rejects_formation_energy_out_of_range() {
        let index = MaterialIndex::new();
        let err = index.identify(465.0, 610.0, 3.0).unwrap_err();
        assert!(matches!(err, MaterialError::FormationEnergyOutOfRange(_)));
    }

    #[test]
    fn unknown_spectrum_is_no_match() {
        let index = MaterialIndex::new();
        let err = index.identify(1500.0, 1900.0, -2.0).unwrap_err();
        assert_eq!(err, MaterialError::NoMatch);
    }
}
