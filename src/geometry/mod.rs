pub mod trilateration;

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::error::KiteConfigError;
use self::trilateration::trilaterate;

/// Named attachment points on the kite, expressed in body frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AnchorId {
    Nez,
    SpineBas,
    BordGauche,
    BordDroit,
    WhiskerGauche,
    WhiskerDroit,
    InterGauche,
    InterDroit,
    Centre,
    FixGauche,
    FixDroit,
    CtrlGauche,
    CtrlDroit,
}

/// A single triangular sail facet, cached in body frame.
#[derive(Debug, Clone)]
pub struct Facet {
    pub vertices: [AnchorId; 3],
    pub area: f64,
    pub centroid: Vector3<f64>,
    pub surface_mass: f64,
}

/// Immutable, per-session kite shape: anchors, facets, and the mass/inertia
/// summary used by the aerodynamics and integrator stages. Rebuilt only
/// when bridle lengths change (which moves `CtrlGauche`/`CtrlDroit`).
#[derive(Debug, Clone)]
pub struct KiteGeometry {
    anchors: HashMap<AnchorId, Vector3<f64>>,
    facets: Vec<Facet>,
    mass: f64,
    inertia: f64,
}

impl KiteGeometry {
    pub fn anchor(&self, id: AnchorId) -> Vector3<f64> {
        self.anchors[&id]
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Sum of per-facet surface mass; should track `mass` within 1%.
    pub fn facet_mass_total(&self) -> f64 {
        self.facets.iter().map(|f| f.surface_mass).sum()
    }
}

fn triangle_area_and_centroid(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> (f64, Vector3<f64>) {
    let area = 0.5 * (b - a).cross(&(c - a)).norm();
    let centroid = (a + b + c) / 3.0;
    (area, centroid)
}

/// Fluent construction of a [`KiteGeometry`], mirroring how a rigid body's
/// mass properties are assembled piece by piece before first flight.
#[derive(Clone)]
pub struct KiteGeometryBuilder {
    anchors: HashMap<AnchorId, Vector3<f64>>,
    facet_vertices: Vec<[AnchorId; 3]>,
    frame_mass: f64,
    fabric_mass: f64,
    accessory_mass: f64,
    inertia: f64,
}

impl KiteGeometryBuilder {
    pub fn new() -> Self {
        KiteGeometryBuilder {
            anchors: HashMap::new(),
            facet_vertices: Vec::new(),
            frame_mass: 0.0,
            fabric_mass: 0.0,
            accessory_mass: 0.0,
            inertia: 0.02,
        }
    }

    pub fn anchor(mut self, id: AnchorId, position: Vector3<f64>) -> Self {
        self.anchors.insert(id, position);
        self
    }

    pub fn facet(mut self, vertices: [AnchorId; 3]) -> Self {
        self.facet_vertices.push(vertices);
        self
    }

    pub fn frame_mass(mut self, kg: f64) -> Self {
        self.frame_mass = kg;
        self
    }

    pub fn fabric_mass(mut self, kg: f64) -> Self {
        self.fabric_mass = kg;
        self
    }

    pub fn accessory_mass(mut self, kg: f64) -> Self {
        self.accessory_mass = kg;
        self
    }

    pub fn inertia(mut self, kg_m2: f64) -> Self {
        self.inertia = kg_m2;
        self
    }

    /// Computes bridle-derived `CtrlGauche`/`CtrlDroit` anchors by
    /// trilateration, then builds facets and mass distribution.
    pub fn build_with_bridles(
        self,
        nez: f64,
        inter: f64,
        centre: f64,
    ) -> Result<KiteGeometry, KiteConfigError> {
        if nez <= 0.0 {
            return Err(KiteConfigError::NonPositiveBridleLength { name: "nez", value: nez });
        }
        if inter <= 0.0 {
            return Err(KiteConfigError::NonPositiveBridleLength { name: "inter", value: inter });
        }
        if centre <= 0.0 {
            return Err(KiteConfigError::NonPositiveBridleLength { name: "centre", value: centre });
        }

        let mut anchors = self.anchors;
        let nez_p = anchors[&AnchorId::Nez];
        let centre_p = anchors[&AnchorId::Centre];
        let bias_gauche = Vector3::new(-1.0, 0.0, 0.0);
        let bias_droit = Vector3::new(1.0, 0.0, 0.0);

        let inter_gauche = anchors[&AnchorId::InterGauche];
        let ctrl_gauche = trilaterate(nez_p, nez, inter_gauche, inter, centre_p, centre, bias_gauche)?;
        anchors.insert(AnchorId::CtrlGauche, ctrl_gauche);

        let inter_droit = anchors[&AnchorId::InterDroit];
        let ctrl_droit = trilaterate(nez_p, nez, inter_droit, inter, centre_p, centre, bias_droit)?;
        anchors.insert(AnchorId::CtrlDroit, ctrl_droit);

        if self.frame_mass <= 0.0 && self.fabric_mass <= 0.0 && self.accessory_mass <= 0.0 {
            return Err(KiteConfigError::NonPositiveMass(0.0));
        }
        if self.inertia <= 0.0 {
            return Err(KiteConfigError::NonPositiveInertia(self.inertia));
        }

        let mut facets = Vec::with_capacity(self.facet_vertices.len());
        let mut total_area = 0.0;
        for vertices in &self.facet_vertices {
            let [a, b, c] = *vertices;
            let (area, centroid) = triangle_area_and_centroid(anchors[&a], anchors[&b], anchors[&c]);
            total_area += area;
            facets.push(Facet {
                vertices: *vertices,
                area,
                centroid,
                surface_mass: 0.0,
            });
        }

        let n_facets = facets.len().max(1) as f64;
        let accessory_share = self.accessory_mass / n_facets;
        let frame_and_fabric = self.frame_mass + self.fabric_mass;
        for facet in &mut facets {
            let area_share = if total_area > 0.0 {
                facet.area / total_area
            } else {
                1.0 / n_facets
            };
            facet.surface_mass = frame_and_fabric * area_share + accessory_share;
        }

        let mass = self.frame_mass + self.fabric_mass + self.accessory_mass;

        Ok(KiteGeometry {
            anchors,
            facets,
            mass,
            inertia: self.inertia,
        })
    }
}

impl Default for KiteGeometryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
