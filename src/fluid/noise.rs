// Noise field: 3D simplex noise with domain warping.
//
// CPU reference for the functions of the same name in `shaders/fluid.wgsl`.

use super::constants::{
    NOISE_FIELD_SCALE, NOISE_TIME_SCALE, POINTER_INFLUENCE_RADIUS, WARP_AMOUNT, WARP_SCALE,
};
use super::math::{smoothstep, step};
use glam::{Vec2, Vec3, Vec3Swizzles, Vec4, Vec4Swizzles};

#[inline]
fn mod289_3(x: Vec3) -> Vec3 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn mod289_4(x: Vec4) -> Vec4 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn permute(x: Vec4) -> Vec4 {
    mod289_4((x * 34.0 + 1.0) * x)
}

#[inline]
fn taylor_inv_sqrt(r: Vec4) -> Vec4 {
    1.792_842_9 - 0.853_734_7 * r
}

#[inline]
fn step3(edge: Vec3, x: Vec3) -> Vec3 {
    Vec3::new(step(edge.x, x.x), step(edge.y, x.y), step(edge.z, x.z))
}

#[inline]
fn step4(edge: Vec4, x: Vec4) -> Vec4 {
    Vec4::new(
        step(edge.x, x.x),
        step(edge.y, x.y),
        step(edge.z, x.z),
        step(edge.w, x.w),
    )
}

/// 3D simplex gradient noise, continuous in all three axes, so sweeping `z`
/// with time animates without popping.
///
/// The wide 0.6 kernel with the x42 gain is not normalized. Output reaches
/// about +-4.3 and the gradient about 25, so callers clamp.
pub fn simplex3(v: Vec3) -> f32 {
    const C: Vec2 = Vec2::new(1.0 / 6.0, 1.0 / 3.0);
    const D: Vec4 = Vec4::new(0.0, 0.5, 1.0, 2.0);

    // Skew to the simplex grid and find the containing cell
    let i = (v + v.dot(Vec3::splat(C.y))).floor();
    let x0 = v - i + i.dot(Vec3::splat(C.x));

    let g = step3(x0.yzx(), x0);
    let l = 1.0 - g;
    let i1 = g.min(l.zxy());
    let i2 = g.max(l.zxy());

    let x1 = x0 - i1 + C.x;
    let x2 = x0 - i2 + C.y;
    let x3 = x0 - D.y;

    let i = mod289_3(i);
    let p = permute(
        permute(
            permute(i.z + Vec4::new(0.0, i1.z, i2.z, 1.0)) + i.y + Vec4::new(0.0, i1.y, i2.y, 1.0),
        ) + i.x
            + Vec4::new(0.0, i1.x, i2.x, 1.0),
    );

    // Gradients on a 7x7 grid mapped onto an octahedron
    let n_ = 0.142_857_14_f32;
    let ns = n_ * D.wyz() - D.xzx();

    let j = p - 49.0 * (p * ns.z * ns.z).floor();
    let x_ = (j * ns.z).floor();
    let y_ = (j - 7.0 * x_).floor();

    let x = x_ * ns.x + ns.y;
    let y = y_ * ns.x + ns.y;
    let h = 1.0 - x.abs() - y.abs();

    let b0 = Vec4::new(x.x, x.y, y.x, y.y);
    let b1 = Vec4::new(x.z, x.w, y.z, y.w);
    let s0 = b0.floor() * 2.0 + 1.0;
    let s1 = b1.floor() * 2.0 + 1.0;
    let sh = -step4(h, Vec4::ZERO);

    let a0 = b0.xzyw() + s0.xzyw() * sh.xxyy();
    let a1 = b1.xzyw() + s1.xzyw() * sh.zzww();

    let p0 = Vec3::new(a0.x, a0.y, h.x);
    let p1 = Vec3::new(a0.z, a0.w, h.y);
    let p2 = Vec3::new(a1.x, a1.y, h.z);
    let p3 = Vec3::new(a1.z, a1.w, h.w);

    let norm = taylor_inv_sqrt(Vec4::new(p0.dot(p0), p1.dot(p1), p2.dot(p2), p3.dot(p3)));
    let p0 = p0 * norm.x;
    let p1 = p1 * norm.y;
    let p2 = p2 * norm.z;
    let p3 = p3 * norm.w;

    let m = (0.6 - Vec4::new(x0.dot(x0), x1.dot(x1), x2.dot(x2), x3.dot(x3))).max(Vec4::ZERO);
    let m = m * m;
    42.0 * (m * m).dot(Vec4::new(p0.dot(x0), p1.dot(x1), p2.dot(x2), p3.dot(x3)))
}

/// Two decorrelated noise samples used to offset another lookup.
#[inline]
pub fn domain_warp(p: Vec2, scale: f32, time: f32, offset: Vec2) -> Vec2 {
    let q = p * scale;
    Vec2::new(
        simplex3((q + offset.x).extend(time)),
        simplex3((q + offset.y).extend(time)),
    )
}

/// Divergence-free rotation derived from the noise gradient.
pub fn curl(p: Vec2, time: f32) -> Vec2 {
    let eps = 0.01;
    let n1 = simplex3(Vec3::new(p.x, p.y + eps, time));
    let n2 = simplex3(Vec3::new(p.x, p.y - eps, time));
    let n3 = simplex3(Vec3::new(p.x + eps, p.y, time));
    let n4 = simplex3(Vec3::new(p.x - eps, p.y, time));
    let dx = (n1 - n2) / (2.0 * eps);
    let dy = (n3 - n4) / (2.0 * eps);
    Vec2::new(dx, -dy)
}

/// Two octaves of curl displacement for the liquid wobble of the blob.
pub fn fluid_distort(uv: Vec2, time: f32, strength: f32) -> Vec2 {
    let c1 = curl(uv * 1.5, time * 0.2) * 0.06;
    let c2 = curl(uv * 3.0 + c1, time * 0.3) * 0.03;
    (c1 + c2) * strength
}

/// The contour field sampled by every pixel, in [0, 1].
///
/// `uv` is aspect-corrected (x scaled by width / height); `time` is seconds.
pub fn noise_field(uv: Vec2, time: f32) -> f32 {
    let t = time * NOISE_TIME_SCALE;
    let warp = domain_warp(uv, WARP_SCALE, t * 0.5, Vec2::ZERO) * WARP_AMOUNT;
    let warped = uv * NOISE_FIELD_SCALE + warp;
    (simplex3(warped.extend(t)) * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Push the noise lookup away from the pointer within a small radius.
#[inline]
pub fn pointer_offset(uv: Vec2, pointer: Vec2, influence: f32) -> Vec2 {
    let falloff = smoothstep(POINTER_INFLUENCE_RADIUS, 0.0, uv.distance(pointer));
    (uv - pointer) * falloff * influence
}
