use crate::engine::ShortestPathEngine;
use crate::graph::NodeId;
use libc::{c_double, size_t};
use ordered_float::OrderedFloat;

#[repr(C)]
pub struct FfiEngine {
    engine: ShortestPathEngine<OrderedFloat<f64>>,
}

/// Builds an engine from `n * n` row-major weights; returns null on invalid input
#[no_mangle]
pub extern "C" fn msssp_engine_new(weights: *const c_double, n: size_t) -> *mut FfiEngine {
    if weights.is_null() || n == 0 {
        return std::ptr::null_mut();
    }
    let Some(len) = n.checked_mul(n) else {
        return std::ptr::null_mut();
    };

    let flat = unsafe { std::slice::from_raw_parts(weights, len) };
    let matrix = flat
        .chunks(n)
        .map(|row| row.iter().map(|&w| OrderedFloat(w)).collect())
        .collect();

    match ShortestPathEngine::new(matrix, None) {
        Ok(engine) => Box::into_raw(Box::new(FfiEngine { engine })),
        Err(err) => {
            log::warn!("msssp_engine_new: {}", err);
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn msssp_engine_node_count(e: *const FfiEngine) -> size_t {
    if e.is_null() {
        return 0;
    }
    unsafe { &*e }.engine.node_count()
}

#[no_mangle]
pub extern "C" fn msssp_engine_free(e: *mut FfiEngine) {
    if !e.is_null() {
        unsafe {
            drop(Box::from_raw(e));
        }
    }
}

/// Distances use `INFINITY` for unreachable nodes, predecessors use `SIZE_MAX`
#[repr(C)]
pub struct FfiResult {
    distances: *mut c_double,
    predecessors: *mut size_t,
    len: size_t,
}

#[no_mangle]
pub extern "C" fn msssp_result_free(res: *mut FfiResult) {
    if !res.is_null() {
        unsafe {
            if !(*res).distances.is_null() {
                drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    (*res).distances,
                    (*res).len,
                )));
            }
            if !(*res).predecessors.is_null() {
                drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    (*res).predecessors,
                    (*res).len,
                )));
            }
            drop(Box::from_raw(res));
        }
    }
}

#[no_mangle]
pub extern "C" fn msssp_shortest_distances(
    e: *const FfiEngine,
    source: size_t,
) -> *mut FfiResult {
    if e.is_null() {
        return std::ptr::null_mut();
    }
    let engine = unsafe { &(*e).engine };

    match engine.shortest_distances(source) {
        Ok(result) => {
            let dist_vec: Vec<c_double> = result
                .iter()
                .map(|(_, _, d)| d.to_f64())
                .collect();
            let pred_vec: Vec<size_t> = (0..dist_vec.len())
                .map(|v| {
                    result
                        .predecessor(NodeId::new(v))
                        .ok()
                        .flatten()
                        .map_or(size_t::MAX, NodeId::index)
                })
                .collect();
            // Boxed slices so the free side can rebuild them from (ptr, len) alone
            let len = dist_vec.len();
            let dist_ptr = Box::into_raw(dist_vec.into_boxed_slice()) as *mut c_double;
            let pred_ptr = Box::into_raw(pred_vec.into_boxed_slice()) as *mut size_t;
            Box::into_raw(Box::new(FfiResult {
                distances: dist_ptr,
                predecessors: pred_ptr,
                len,
            }))
        }
        Err(err) => {
            log::warn!("msssp_shortest_distances: {}", err);
            std::ptr::null_mut()
        }
    }
}
